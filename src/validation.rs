//! Field-level rules applied before a write reaches the repository.

use uuid::Uuid;

use crate::error::AppError;

/// An id that does not parse cannot name a record, so it reports as missing.
pub fn parse_id(raw: &str, not_found: fn() -> AppError) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| not_found())
}

/// A required field must be present and not blank.
pub fn required(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

/// On update a required field may be omitted, but not blanked.
pub fn required_if_present(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    value.map(|v| required(field, Some(v))).transpose()
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
