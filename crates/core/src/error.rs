//! Stock error model.

use thiserror::Error;

use crate::id::Isbn;

/// Result type used across the stock ledger.
pub type StockResult<T> = Result<T, StockError>;

/// Stock-level error.
///
/// Every variant is surfaced to the caller as-is; nothing is retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockError {
    /// Outbound against an identifier that is not in the inventory.
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(Isbn),

    /// Requested quantity exceeds quantity on hand.
    #[error("insufficient stock for {isbn}: requested {requested}, on hand {on_hand}")]
    InsufficientStock {
        isbn: Isbn,
        requested: i64,
        on_hand: i64,
    },

    /// A new identifier was received without one of title, author or price.
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// A value failed validation (e.g. non-positive quantity, blank identifier).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The ledger store was unreachable or rejected the write.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl StockError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Stable machine-readable code, used for API error bodies and log fields.
    pub fn code(&self) -> &'static str {
        match self {
            StockError::UnknownIdentifier(_) => "unknown_identifier",
            StockError::InsufficientStock { .. } => "insufficient_stock",
            StockError::MissingRequiredField(_) => "missing_required_field",
            StockError::Validation(_) => "validation_error",
            StockError::Persistence(_) => "persistence_error",
        }
    }
}
