//! Centralized error handling.
//!
//! Provides a unified error type for the entire application.
//! Validation and resolution errors are returned to the immediate
//! caller; nothing here retries or recovers internally.

use thiserror::Error;

use crate::domain::AttributeType;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Attribute resolution
    #[error("attribute '{0}' not found")]
    AttributeNotFound(String),

    #[error("attribute '{attribute}' is not applicable to entity type '{entity_type}'")]
    AttributeNotApplicable {
        attribute: String,
        entity_type: String,
    },

    // Validation
    #[error("{0}")]
    Validation(String),

    // Read-path coercion: the stored text cannot be interpreted
    // as the attribute's declared type.
    #[error("cannot coerce stored value '{value}' to {expected}")]
    TypeCoercion {
        expected: AttributeType,
        value: String,
    },

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get a stable error code for logging and client mapping
    pub fn code(&self) -> &'static str {
        match self {
            AppError::AttributeNotFound(_) => "ATTRIBUTE_NOT_FOUND",
            AppError::AttributeNotApplicable { .. } => "ATTRIBUTE_NOT_APPLICABLE",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::TypeCoercion { .. } => "TYPE_COERCION_ERROR",
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn coercion(expected: AttributeType, value: impl Into<String>) -> Self {
        AppError::TypeCoercion {
            expected,
            value: value.into(),
        }
    }
}
