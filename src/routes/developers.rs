use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::developer_dto::DeveloperResponse,
    error::Result,
    extractors::{ApiPath, DeveloperForm},
    services::developer_service::DeveloperWithSkills,
    AppState,
};

fn respond(state: &AppState, record: DeveloperWithSkills) -> DeveloperResponse {
    DeveloperResponse::new(record.developer, record.skills, &state.media)
}

#[utoipa::path(
    get,
    path = "/api/developers/",
    tag = "developers",
    responses(
        (status = 200, description = "All developers", body = [DeveloperResponse])
    )
)]
#[axum::debug_handler]
pub async fn list_developers(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let developers = state.developer_service.list().await?;
    let body: Vec<DeveloperResponse> = developers
        .into_iter()
        .map(|record| respond(&state, record))
        .collect();
    Ok(Json(body))
}

#[utoipa::path(
    post,
    path = "/api/developers/",
    tag = "developers",
    request_body = crate::dto::developer_dto::DeveloperPayload,
    responses(
        (status = 201, description = "Developer created", body = DeveloperResponse),
        (status = 400, description = "Invalid payload or unknown skill id"),
        (status = 409, description = "Id or email already in use")
    )
)]
#[axum::debug_handler]
pub async fn create_developer(
    State(state): State<AppState>,
    form: DeveloperForm,
) -> Result<impl IntoResponse> {
    let (new, uploads) = form.into_new()?;
    let record = state.developer_service.create(new, uploads).await?;
    Ok((StatusCode::CREATED, Json(respond(&state, record))))
}

#[utoipa::path(
    get,
    path = "/api/developers/{id}/",
    tag = "developers",
    params(
        ("id" = i64, Path, description = "Developer ID")
    ),
    responses(
        (status = 200, description = "Developer found", body = DeveloperResponse),
        (status = 404, description = "Developer not found")
    )
)]
#[axum::debug_handler]
pub async fn get_developer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    let record = state.developer_service.get_by_id(id).await?;
    Ok(Json(respond(&state, record)))
}

#[utoipa::path(
    put,
    path = "/api/developers/{id}/",
    tag = "developers",
    params(
        ("id" = i64, Path, description = "Developer ID")
    ),
    request_body = crate::dto::developer_dto::DeveloperPayload,
    responses(
        (status = 200, description = "Developer replaced", body = DeveloperResponse),
        (status = 400, description = "Invalid payload or unknown skill id"),
        (status = 404, description = "Developer not found"),
        (status = 409, description = "Email already in use")
    )
)]
#[axum::debug_handler]
pub async fn replace_developer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    form: DeveloperForm,
) -> Result<impl IntoResponse> {
    let (changes, uploads) = form.into_changes(false)?;
    let record = state.developer_service.update(id, changes, uploads).await?;
    Ok(Json(respond(&state, record)))
}

#[utoipa::path(
    patch,
    path = "/api/developers/{id}/",
    tag = "developers",
    params(
        ("id" = i64, Path, description = "Developer ID")
    ),
    request_body = crate::dto::developer_dto::DeveloperPayload,
    responses(
        (status = 200, description = "Developer updated", body = DeveloperResponse),
        (status = 400, description = "Invalid payload or unknown skill id"),
        (status = 404, description = "Developer not found"),
        (status = 409, description = "Email already in use")
    )
)]
#[axum::debug_handler]
pub async fn update_developer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    form: DeveloperForm,
) -> Result<impl IntoResponse> {
    let (changes, uploads) = form.into_changes(true)?;
    let record = state.developer_service.update(id, changes, uploads).await?;
    Ok(Json(respond(&state, record)))
}

#[utoipa::path(
    delete,
    path = "/api/developers/{id}/",
    tag = "developers",
    params(
        ("id" = i64, Path, description = "Developer ID")
    ),
    responses(
        (status = 204, description = "Developer deleted"),
        (status = 404, description = "Developer not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_developer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    state.developer_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
