use crate::domain::schema::BODY_FIELD;
use crate::domain::{ServiceError, ValidationError};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::Json;
use serde_json::Value as JsonValue;

/// Unwraps a JSON body; unparsable bodies are validation failures (400).
pub fn json_body(body: Result<Json<JsonValue>, JsonRejection>) -> Result<JsonValue, ServiceError> {
    match body {
        Ok(Json(v)) => Ok(v),
        Err(e) => Err(ValidationError::single(BODY_FIELD, "json", e.body_text()).into()),
    }
}

/// Unwraps a path identifier; a malformed id is a validation failure (400) on field `id`.
pub fn path_id<T>(id: Result<Path<T>, PathRejection>) -> Result<T, ServiceError> {
    match id {
        Ok(Path(v)) => Ok(v),
        Err(e) => Err(ValidationError::single("id", "type", e.body_text()).into()),
    }
}

/// Unwraps query-string parameters; malformed values are validation failures (400).
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ServiceError> {
    match query {
        Ok(Query(v)) => Ok(v),
        Err(e) => Err(ValidationError::single("<query>", "type", e.body_text()).into()),
    }
}
