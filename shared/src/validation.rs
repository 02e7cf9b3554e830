//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by
//! the resource managers before anything is sent over the wire or
//! written to the local store.

use crate::error::DomainError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: doctor, product, zone, territory, task title, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, remarks, rejection reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, batch number, period label, category, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Addresses and clinic locations
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(DomainError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), DomainError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(DomainError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate that a quantity or amount is strictly positive.
pub fn validate_positive(value: i64, field: &str) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::validation(format!(
            "{field} must be positive"
        )));
    }
    Ok(())
}

/// Validate that a monetary amount is strictly positive and finite.
pub fn validate_amount(value: f64, field: &str) -> Result<(), DomainError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DomainError::validation(format!(
            "{field} must be a positive amount"
        )));
    }
    Ok(())
}
