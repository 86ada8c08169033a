use crate::domain::model::{NewOrder, Order, OrderPatch};
use crate::domain::{validate_payload, ServiceError};
use crate::transport::http::handlers::common::{json_body, path_id};
use crate::transport::http::types::{respond, ApiResponse, AppState};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde_json::Value as JsonValue;

/// Creates an order. The total is `product.price × quantity × 1.2`; a `total` in the body is ignored.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = NewOrder,
    responses(
        (status = 201, description = "Order created", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 404, description = "product not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "orders"
)]
pub async fn create_order_handler(
    State(state): State<AppState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let input: NewOrder = validate_payload(json_body(body)?)?;
    let order = state.db_service.create_order(input).await?;
    tracing::info!(order_id = order.id, total = %order.total, "order created");
    Ok(respond(StatusCode::CREATED, &order))
}

#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "All orders", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "orders"
)]
pub async fn list_orders_handler(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let orders: Vec<Order> = state.db_service.list_orders().await?;
    Ok(respond(StatusCode::OK, &orders))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = ApiResponse),
        (status = 404, description = "Order not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "orders"
)]
pub async fn get_order_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, ServiceError> {
    let order = state.db_service.get_order(path_id(id)?).await?;
    Ok(respond(StatusCode::OK, &order))
}

#[utoipa::path(
    patch,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order id")),
    request_body = OrderPatch,
    responses(
        (status = 200, description = "Updated order (total recomputed when product or quantity change)", body = ApiResponse),
        (status = 400, description = "Validation failed or no field to update", body = ApiResponse),
        (status = 404, description = "Order or product not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "orders"
)]
pub async fn patch_order_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let id = path_id(id)?;
    let patch: OrderPatch = validate_payload(json_body(body)?)?;
    let order = state.db_service.update_order(id, patch).await?;
    Ok(respond(StatusCode::OK, &order))
}

#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Deleted order, as it was", body = ApiResponse),
        (status = 404, description = "Order not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "orders"
)]
pub async fn delete_order_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, ServiceError> {
    let order = state.db_service.delete_order(path_id(id)?).await?;
    tracing::info!(order_id = order.id, "order deleted");
    Ok(respond(StatusCode::OK, &order))
}
