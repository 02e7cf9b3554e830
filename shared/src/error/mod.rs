//! Domain errors shared across the workspace
//!
//! These cover rule violations that are decided before or after any
//! network round trip: bad input, stale references, ledger shortfalls,
//! and status transitions the workflow does not allow.

use thiserror::Error;

/// Unified domain error type
#[derive(Debug, Error)]
pub enum DomainError {
    /// Input failed validation
    #[error("{0}")]
    Validation(String),

    /// Referenced record does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// More units requested than the warehouse still holds
    #[error("insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: i64,
        available: i64,
    },

    /// Status change not allowed from the current status
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

impl DomainError {
    // ========== Convenient constructors ==========

    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a NotFound error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
