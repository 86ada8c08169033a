use crate::domain::model::{NewUser, User, UserPatch};
use crate::domain::{validate_payload, ServiceError};
use crate::transport::http::handlers::common::{json_body, path_id};
use crate::transport::http::types::{respond, ApiResponse, AppState};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde_json::Value as JsonValue;

#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users (without passwords)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "users"
)]
pub async fn list_users_handler(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let users: Vec<User> = state.db_service.list_users().await?;
    Ok(respond(StatusCode::OK, &users))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User (without password)", body = ApiResponse),
        (status = 404, description = "User not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "users"
)]
pub async fn get_user_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, ServiceError> {
    let user = state.db_service.get_user(path_id(id)?).await?;
    Ok(respond(StatusCode::OK, &user))
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 500, description = "Internal server error (e.g. duplicate email)", body = ApiResponse)
    ),
    tag = "users"
)]
pub async fn create_user_handler(
    State(state): State<AppState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let input: NewUser = validate_payload(json_body(body)?)?;
    let user = state.db_service.create_user(input).await?;
    tracing::info!(user_id = user.id, "user created");
    Ok(respond(StatusCode::CREATED, &user))
}

/// Full update: every field is required, exactly as on creation.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    request_body = NewUser,
    responses(
        (status = 200, description = "Updated user", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 404, description = "User not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "users"
)]
pub async fn put_user_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let id = path_id(id)?;
    let input: NewUser = validate_payload(json_body(body)?)?;
    let user = state.db_service.update_user(id, input.into()).await?;
    Ok(respond(StatusCode::OK, &user))
}

#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserPatch,
    responses(
        (status = 200, description = "Updated user", body = ApiResponse),
        (status = 400, description = "Validation failed or no field to update", body = ApiResponse),
        (status = 404, description = "User not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "users"
)]
pub async fn patch_user_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let id = path_id(id)?;
    let patch: UserPatch = validate_payload(json_body(body)?)?;
    let user = state.db_service.update_user(id, patch).await?;
    Ok(respond(StatusCode::OK, &user))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted user, as it was", body = ApiResponse),
        (status = 404, description = "User not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "users"
)]
pub async fn delete_user_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, ServiceError> {
    let user = state.db_service.delete_user(path_id(id)?).await?;
    tracing::info!(user_id = user.id, "user deleted");
    Ok(respond(StatusCode::OK, &user))
}
