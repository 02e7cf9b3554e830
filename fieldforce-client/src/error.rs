//! Client error types

use thiserror::Error;

use crate::store::StoreError;
use shared::DomainError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found on the server
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server rejected the payload
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-2xx response, carrying the server's body text
    #[error("API error: {0}")]
    Api(String),

    /// Local store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Domain rule violation
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
