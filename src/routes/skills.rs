use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::skill_dto::{SkillPayload, SkillResponse},
    error::Result,
    extractors::{ApiJson, ApiPath},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/skills/",
    tag = "skills",
    responses(
        (status = 200, description = "All skills", body = [SkillResponse])
    )
)]
#[axum::debug_handler]
pub async fn list_skills(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let skills = state.skill_service.list().await?;
    let body: Vec<SkillResponse> = skills.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

#[utoipa::path(
    post,
    path = "/api/skills/",
    tag = "skills",
    request_body = SkillPayload,
    responses(
        (status = 201, description = "Skill created", body = SkillResponse),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_skill(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SkillPayload>,
) -> Result<impl IntoResponse> {
    let skill = state.skill_service.create(payload.into_new()?).await?;
    Ok((StatusCode::CREATED, Json(SkillResponse::from(skill))))
}

#[utoipa::path(
    get,
    path = "/api/skills/{id}/",
    tag = "skills",
    params(
        ("id" = i64, Path, description = "Skill ID")
    ),
    responses(
        (status = 200, description = "Skill found", body = SkillResponse),
        (status = 404, description = "Skill not found")
    )
)]
#[axum::debug_handler]
pub async fn get_skill(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    let skill = state.skill_service.get_by_id(id).await?;
    Ok(Json(SkillResponse::from(skill)))
}

#[utoipa::path(
    put,
    path = "/api/skills/{id}/",
    tag = "skills",
    params(
        ("id" = i64, Path, description = "Skill ID")
    ),
    request_body = SkillPayload,
    responses(
        (status = 200, description = "Skill replaced", body = SkillResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Skill not found")
    )
)]
#[axum::debug_handler]
pub async fn replace_skill(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<SkillPayload>,
) -> Result<impl IntoResponse> {
    let skill = state
        .skill_service
        .update(id, payload.into_changes(false)?)
        .await?;
    Ok(Json(SkillResponse::from(skill)))
}

#[utoipa::path(
    patch,
    path = "/api/skills/{id}/",
    tag = "skills",
    params(
        ("id" = i64, Path, description = "Skill ID")
    ),
    request_body = SkillPayload,
    responses(
        (status = 200, description = "Skill updated", body = SkillResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Skill not found")
    )
)]
#[axum::debug_handler]
pub async fn update_skill(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<SkillPayload>,
) -> Result<impl IntoResponse> {
    let skill = state
        .skill_service
        .update(id, payload.into_changes(true)?)
        .await?;
    Ok(Json(SkillResponse::from(skill)))
}

#[utoipa::path(
    delete,
    path = "/api/skills/{id}/",
    tag = "skills",
    params(
        ("id" = i64, Path, description = "Skill ID")
    ),
    responses(
        (status = 204, description = "Skill deleted and unlinked from developers"),
        (status = 404, description = "Skill not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_skill(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    state.skill_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
