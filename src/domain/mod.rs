pub mod error;
pub mod model;
pub mod schema;

pub use error::{ServiceError, ServiceResult};
pub use schema::{validate_payload, FieldError, Schema, ValidationError};
