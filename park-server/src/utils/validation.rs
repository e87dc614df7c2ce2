//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits mirror the column widths of the booking schema;
//! SQLite TEXT has no built-in length enforcement.

use crate::db::repository::RepoError;

// ── Text length limits ──────────────────────────────────────────────

/// Customer names
pub const MAX_NAME_LEN: usize = 100;

/// Vehicle registration numbers
pub const MAX_VEHICLE_LEN: usize = 20;

/// Phone numbers
pub const MAX_PHONE_LEN: usize = 15;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), RepoError> {
    if value.trim().is_empty() {
        return Err(RepoError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(RepoError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}
