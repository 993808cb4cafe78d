use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Browsable root listing the collection endpoints.
#[utoipa::path(
    get,
    path = "/api/",
    tag = "index",
    responses(
        (status = 200, description = "Collection URLs by resource name")
    )
)]
pub async fn api_root() -> impl IntoResponse {
    Json(json!({
        "developers": "/api/developers/",
        "skills": "/api/skills/",
    }))
}

pub async fn openapi_json() -> impl IntoResponse {
    use utoipa::OpenApi;
    Json(crate::docs::ApiDoc::openapi())
}
