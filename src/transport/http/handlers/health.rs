use crate::domain::ServiceResult;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value as JsonValue};

/// Builds the `/health` reply for either service: 200 with `details` once the datastore
/// answered, 503 with the failure text otherwise.
pub fn health_report(datastore: ServiceResult<()>, mut details: JsonValue) -> Response {
    match datastore {
        Ok(()) => {
            details["status"] = json!("ok");
            (StatusCode::OK, Json(ApiResponse::ok(details))).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            details["status"] = json!("unhealthy");
            let body = ApiResponse::failure(format!("datastore unreachable: {}", e), Some(details));
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Postgres answered a ping", body = ApiResponse),
        (status = 503, description = "Postgres did not answer", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> Response {
    health_report(state.db_service.ping().await, json!({ "datastore": "postgres" }))
}
