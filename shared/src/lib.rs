//! Shared types for the fieldforce workspace
//!
//! Common types used across crates: domain entities and their
//! create/update payloads, domain errors, validation helpers, and the
//! pure list filtering / pagination engine.

pub mod error;
pub mod list;
pub mod models;
pub mod validation;

// Re-exports
pub use error::{DomainError, DomainResult};
pub use serde::{Deserialize, Serialize};
