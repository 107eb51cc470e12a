//! Input validation helpers
//!
//! Identifiers are checked before any query runs so a malformed reference
//! never reaches the database driver.

use uuid::Uuid;

use crate::AppError;

/// Length of the canonical hyphenated identifier form.
const IDENTIFIER_LEN: usize = 36;

/// Parse an external identifier, failing with `InvalidIdentifier` when it is
/// not a canonical 36-character hyphenated hex identifier.
pub fn parse_object_id(raw: &str, label: &str) -> Result<Uuid, AppError> {
    let invalid = || AppError::InvalidIdentifier(format!("Invalid {} id", label));

    if raw.len() != IDENTIFIER_LEN {
        return Err(invalid());
    }
    Uuid::try_parse(raw).map_err(|_| invalid())
}

/// Require a text field to be present and non-blank, returning it trimmed.
pub fn require_text(value: Option<&str>, message: &str) -> Result<String, AppError> {
    optional_text(value).ok_or_else(|| AppError::Validation(message.to_string()))
}

/// Trim an optional text field, treating blank input as absent.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
