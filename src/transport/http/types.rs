use crate::app::DatabaseService;
use crate::domain::ServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

/// Shared state of the store API. The pool inside `DatabaseService` is the only shared resource.
#[derive(Clone)]
pub struct AppState {
    pub db_service: Arc<DatabaseService>,
}

/// Envelope for every response body.
///
/// * success: `data` holds the entity (or list of entities).
/// * 400: `data` holds `{ "errors": [FieldError, ...] }`.
/// * 500: `data` holds `{ "cause": "<underlying error text>" }`.
#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>, data: Option<JsonValue>) -> Self {
        Self {
            success: false,
            data,
            error: Some(error.into()),
        }
    }
}

/// Serializes `body` into a success envelope with the given status.
pub fn respond<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_value(body) {
        Ok(data) => (status, Json(ApiResponse::ok(data))).into_response(),
        Err(e) => ServiceError::Datastore(e.into()).into_response(),
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServiceError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::failure(
                    "Validation failed",
                    Some(serde_json::json!({ "errors": err.errors })),
                ),
            ),
            ServiceError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ApiResponse::failure(format!("{} not found", resource), None),
            ),
            ServiceError::Datastore(err) => {
                tracing::error!(error = %format!("{:#}", err), "datastore failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::failure(
                        "Internal server error",
                        Some(serde_json::json!({ "cause": format!("{:#}", err) })),
                    ),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
