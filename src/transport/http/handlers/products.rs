use crate::domain::model::{NewProduct, Product, ProductFilter, ProductPatch};
use crate::domain::{validate_payload, ServiceError};
use crate::transport::http::handlers::common::{json_body, path_id, query_params};
use crate::transport::http::types::{respond, ApiResponse, AppState};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde_json::Value as JsonValue;

#[utoipa::path(
    post,
    path = "/products",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "products"
)]
pub async fn create_product_handler(
    State(state): State<AppState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let input: NewProduct = validate_payload(json_body(body)?)?;
    let product = state.db_service.create_product(input).await?;
    tracing::info!(product_id = product.id, "product created");
    Ok(respond(StatusCode::CREATED, &product))
}

#[utoipa::path(
    get,
    path = "/products",
    params(ProductFilter),
    responses(
        (status = 200, description = "Products matching every given filter", body = ApiResponse),
        (status = 400, description = "Malformed filter", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "products"
)]
pub async fn list_products_handler(
    State(state): State<AppState>,
    filter: Result<Query<ProductFilter>, QueryRejection>,
) -> Result<Response, ServiceError> {
    let filter = query_params(filter)?;
    let products: Vec<Product> = state.db_service.list_products(filter).await?;
    Ok(respond(StatusCode::OK, &products))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ApiResponse),
        (status = 404, description = "Product not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "products"
)]
pub async fn get_product_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, ServiceError> {
    let product = state.db_service.get_product(path_id(id)?).await?;
    Ok(respond(StatusCode::OK, &product))
}

#[utoipa::path(
    patch,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse),
        (status = 400, description = "Validation failed or no field to update", body = ApiResponse),
        (status = 404, description = "Product not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "products"
)]
pub async fn patch_product_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let id = path_id(id)?;
    let patch: ProductPatch = validate_payload(json_body(body)?)?;
    let product = state.db_service.update_product(id, patch).await?;
    Ok(respond(StatusCode::OK, &product))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Deleted product, as it was", body = ApiResponse),
        (status = 404, description = "Product not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "products"
)]
pub async fn delete_product_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, ServiceError> {
    let product = state.db_service.delete_product(path_id(id)?).await?;
    tracing::info!(product_id = product.id, "product deleted");
    Ok(respond(StatusCode::OK, &product))
}
