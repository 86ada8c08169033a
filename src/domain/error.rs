//! Error taxonomy shared by both services.

use crate::domain::schema::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed, missing or out-of-range input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No row/document matches the identifier. Carries the resource name.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Connectivity, constraint or any other unexpected datastore failure.
    #[error("datastore error: {0:#}")]
    Datastore(anyhow::Error),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Datastore(e.into())
    }
}

impl From<anyhow::Error> for ServiceError {
    fn from(e: anyhow::Error) -> Self {
        ServiceError::Datastore(e)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
