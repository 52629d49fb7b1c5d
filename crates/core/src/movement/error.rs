//! Movement error types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use mazerp_shared::AppError;
use mazerp_shared::types::{InventoryId, MovementId};

use super::types::ChildKind;

/// Movement operation errors.
#[derive(Debug, Error)]
pub enum MovementError {
    /// Quantity is zero.
    #[error("quantity must not be zero")]
    ZeroQuantity,

    /// Description exceeds the column width.
    #[error("description is {len} characters long, maximum is {max}")]
    DescriptionTooLong {
        /// Actual length in characters.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// A price is zero or negative.
    #[error("{field} must be greater than zero, got {value}")]
    NonPositivePrice {
        /// Offending field.
        field: &'static str,
        /// Supplied value.
        value: Decimal,
    },

    /// A value carries more decimal places than its column stores.
    #[error("{field} allows at most {max} decimal places, got {value}")]
    TooManyDecimals {
        /// Offending field.
        field: &'static str,
        /// Supplied value.
        value: Decimal,
        /// Column scale.
        max: u32,
    },

    /// Discount outside 0..=100.
    #[error("discount percentage must be between 0 and 100, got {0}")]
    DiscountOutOfRange(Decimal),

    /// Expense type name not recognised.
    #[error("unknown expense type: {0}")]
    UnknownExpenseType(String),

    /// Date range with start after end.
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange {
        /// Lower bound.
        start: DateTime<Utc>,
        /// Upper bound.
        end: DateTime<Utc>,
    },

    /// Referenced inventory does not exist.
    #[error("inventory not found: {0}")]
    InventoryNotFound(InventoryId),

    /// Movement not found.
    #[error("movement not found: {0}")]
    NotFound(MovementId),

    /// No child of this kind owns the movement.
    #[error("{kind} not found: {id}")]
    ChildNotFound {
        /// Child table that was searched.
        kind: ChildKind,
        /// Shared key.
        id: MovementId,
    },

    /// Direct mutation blocked by an existing child.
    #[error("movement {0} has related records")]
    HasRelatedRecords(MovementId),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl MovementError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Create a child not found error.
    #[must_use]
    pub const fn child_not_found(kind: ChildKind, id: MovementId) -> Self {
        Self::ChildNotFound { kind, id }
    }
}

impl From<MovementError> for AppError {
    fn from(err: MovementError) -> Self {
        match err {
            MovementError::NotFound(_) | MovementError::ChildNotFound { .. } => {
                Self::NotFound(err.to_string())
            }
            MovementError::HasRelatedRecords(_) => Self::Conflict(err.to_string()),
            MovementError::Repository(msg) => Self::Database(msg),
            _ => Self::Validation(err.to_string()),
        }
    }
}
