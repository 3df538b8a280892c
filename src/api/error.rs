// ==========================================
// Shipment Import - API Error Types
// ==========================================
// Responsibility: one error type for hosts; converts importer and
// repository errors and renders a localized message
// ==========================================

use crate::i18n::{t_in, t_in_with_args};
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("duplicate value: {0}")]
    Duplicate(String),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

// ==========================================
// From RepositoryError
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("lock acquisition failed: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => ApiError::Duplicate(msg),
            RepositoryError::ForeignKeyViolation(msg) => ApiError::DatabaseError(msg),
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("{}: {}", field, message))
            }
            RepositoryError::SerializationError(msg) => ApiError::InternalError(msg),
        }
    }
}

impl ApiError {
    /// Message for the end user in the given locale
    pub fn user_message(&self, locale: &str) -> String {
        match self {
            ApiError::Import(err) => err.user_message(locale),
            ApiError::InvalidInput(detail) => {
                t_in_with_args(locale, "api.invalid_input", &[("detail", detail)])
            }
            ApiError::Duplicate(_)
            | ApiError::DatabaseError(_)
            | ApiError::DatabaseConnectionError(_) => t_in(locale, "api.database_error"),
            _ => t_in(locale, "api.internal_error"),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
