use utoipa::OpenApi;

use crate::dto::{
    developer_dto::{DeveloperPayload, DeveloperResponse},
    skill_dto::{SkillPayload, SkillResponse},
};
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::index::api_root,
        routes::health::health,
        routes::developers::list_developers,
        routes::developers::create_developer,
        routes::developers::get_developer,
        routes::developers::replace_developer,
        routes::developers::update_developer,
        routes::developers::delete_developer,
        routes::skills::list_skills,
        routes::skills::create_skill,
        routes::skills::get_skill,
        routes::skills::replace_skill,
        routes::skills::update_skill,
        routes::skills::delete_skill,
    ),
    components(schemas(DeveloperPayload, DeveloperResponse, SkillPayload, SkillResponse)),
    tags(
        (name = "developers", description = "Developer profiles"),
        (name = "skills", description = "Skill catalogue"),
    )
)]
pub struct ApiDoc;
