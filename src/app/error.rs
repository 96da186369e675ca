use crate::app::catalog_service::FieldViolation;
use crate::storage::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A category name or filter argument was missing or malformed.
    #[error("{0}")]
    Validation(String),
    /// A product field failed validation; carries its own HTTP status.
    #[error("{}", .0.message)]
    Field(FieldViolation),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("failed to read photo upload: {0}")]
    Photo(#[from] std::io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<FieldViolation> for ServiceError {
    fn from(violation: FieldViolation) -> Self {
        ServiceError::Field(violation)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
