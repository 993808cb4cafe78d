pub mod developers;
pub mod health;
pub mod index;
pub mod skills;

use axum::{
    routing::{get, MethodRouter},
    Router,
};

use crate::AppState;

/// Registers `path` both with and without the trailing slash.
fn resource(router: Router<AppState>, path: &str, handlers: MethodRouter<AppState>) -> Router<AppState> {
    router
        .route(path, handlers.clone())
        .route(&format!("{}/", path), handlers)
}

pub fn api_router() -> Router<AppState> {
    let router = Router::new().route("/api/openapi.json", get(index::openapi_json));
    let router = resource(router, "/api", get(index::api_root));

    let router = resource(
        router,
        "/api/developers",
        get(developers::list_developers).post(developers::create_developer),
    );
    let router = resource(
        router,
        "/api/developers/:id",
        get(developers::get_developer)
            .put(developers::replace_developer)
            .patch(developers::update_developer)
            .delete(developers::delete_developer),
    );
    let router = resource(
        router,
        "/api/skills",
        get(skills::list_skills).post(skills::create_skill),
    );
    resource(
        router,
        "/api/skills/:id",
        get(skills::get_skill)
            .put(skills::replace_skill)
            .patch(skills::update_skill)
            .delete(skills::delete_skill),
    )
}

/// Every route the service answers, before state and middleware are attached.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .merge(api_router())
}
