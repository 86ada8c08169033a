use crate::domain::model::NewCategory;
use crate::domain::{validate_payload, ServiceError};
use crate::transport::catalog::CatalogState;
use crate::transport::http::handlers::common::{json_body, path_id};
use crate::transport::http::types::respond;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde_json::Value as JsonValue;
use uuid::Uuid;

pub async fn create_category_handler(
    State(state): State<CatalogState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let input: NewCategory = validate_payload(json_body(body)?)?;
    let category = state.catalog.create_category(input).await?;
    tracing::info!(category_id = %category.id, "category created");
    Ok(respond(StatusCode::OK, &category))
}

pub async fn list_categories_handler(
    State(state): State<CatalogState>,
) -> Result<Response, ServiceError> {
    let categories = state.catalog.list_categories().await?;
    Ok(respond(StatusCode::OK, &categories))
}

pub async fn get_category_handler(
    State(state): State<CatalogState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ServiceError> {
    let category = state.catalog.get_category(path_id(id)?).await?;
    Ok(respond(StatusCode::OK, &category))
}

pub async fn delete_category_handler(
    State(state): State<CatalogState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ServiceError> {
    let category = state.catalog.delete_category(path_id(id)?).await?;
    Ok(respond(StatusCode::OK, &category))
}
