//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::catalog::records::ProductUuid;

/// SQLSTATE codes PostgreSQL uses to abort a transaction that lost a lock
/// conflict: `deadlock_detected` and `serialization_failure`.
const LOCK_CONFLICT_CODES: [&str; 2] = ["40P01", "40001"];

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order has no valid line items")]
    InvalidOrder,

    #[error("products unavailable: {}", .products.join(", "))]
    ProductUnavailable { products: Vec<String> },

    #[error("insufficient stock for product {product}")]
    InsufficientStock { product: ProductUuid },

    #[error("cart mixes currencies {first} and {second}")]
    MixedCurrency { first: String, second: String },

    #[error("order amount is out of range")]
    AmountOverflow,

    #[error("could not allocate a unique order number")]
    OrderNumberExhausted,

    #[error("failed to persist order")]
    Persistence(#[source] Error),

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl OrdersServiceError {
    /// True for failures caused by the submitted cart rather than the system.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidOrder
                | Self::ProductUnavailable { .. }
                | Self::InsufficientStock { .. }
                | Self::MixedCurrency { .. }
                | Self::AmountOverflow
        )
    }

    /// True when PostgreSQL aborted the transaction over a lock conflict and
    /// the same work may succeed if started again.
    #[must_use]
    pub fn is_lock_conflict(&self) -> bool {
        let (Self::Sql(error) | Self::Persistence(error)) = self else {
            return false;
        };

        error
            .as_database_error()
            .and_then(DatabaseError::code)
            .is_some_and(|code| LOCK_CONFLICT_CODES.contains(&code.as_ref()))
    }
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
