use crate::domain::model::NewCatalogProduct;
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

pub async fn create_product_handler(
    State(state): State<CatalogState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let input: NewCatalogProduct = validate_payload(json_body(body)?)?;
    let product = state.catalog.create_product(input).await?;
    tracing::info!(product_id = %product.id, "catalog product created");
    Ok(respond(StatusCode::OK, &product))
}

/// Lists every product with its categories joined in.
pub async fn list_products_handler(
    State(state): State<CatalogState>,
) -> Result<Response, ServiceError> {
    let products = state.catalog.list_products().await?;
    Ok(respond(StatusCode::OK, &products))
}

pub async fn get_product_handler(
    State(state): State<CatalogState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ServiceError> {
    let product = state.catalog.get_product(path_id(id)?).await?;
    Ok(respond(StatusCode::OK, &product))
}

pub async fn delete_product_handler(
    State(state): State<CatalogState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ServiceError> {
    let product = state.catalog.delete_product(path_id(id)?).await?;
    tracing::info!(product_id = %product.id, "catalog product deleted");
    Ok(respond(StatusCode::OK, &product))
}
