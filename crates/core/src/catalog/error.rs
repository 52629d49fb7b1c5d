//! Catalog error types.

use thiserror::Error;

use mazerp_shared::AppError;

/// Catalog operation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Input failed validation.
    #[error("{0}")]
    Invalid(String),

    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name.
        entity: &'static str,
        /// Key that was looked up.
        id: i32,
    },

    /// Unique constraint would be violated.
    #[error("{0}")]
    Duplicate(String),

    /// Entity is still referenced and cannot be removed.
    #[error("{0}")]
    InUse(String),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl CatalogError {
    /// Create a not found error.
    #[must_use]
    pub const fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Invalid(msg) => Self::Validation(msg),
            CatalogError::NotFound { .. } => Self::NotFound(err.to_string()),
            CatalogError::Duplicate(msg) | CatalogError::InUse(msg) => Self::Conflict(msg),
            CatalogError::Repository(msg) => Self::Database(msg),
        }
    }
}
