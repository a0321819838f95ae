// ABOUTME: Input validation shared by storage layers and HTTP handlers
// ABOUTME: Name, notes, code, and scan date checks with typed errors

use chrono::NaiveDate;
use thiserror::Error;

use crate::utils::{CODE_ALPHABET, CODE_LENGTH};

pub const MAX_ENTRY_NAME_LENGTH: usize = 200;
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;
pub const MAX_NOTES_LENGTH: usize = 2000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
    #[error("{field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("Invalid code: {0}")]
    InvalidCode(String),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

fn validate_text(value: &str, field: &'static str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

/// Validate and normalize an entry name, returning the trimmed value
pub fn validate_entry_name(name: &str) -> Result<String, ValidationError> {
    validate_text(name, "Entry name", MAX_ENTRY_NAME_LENGTH)
}

/// Validate and normalize a category name, returning the trimmed value
pub fn validate_category_name(name: &str) -> Result<String, ValidationError> {
    validate_text(name, "Category name", MAX_CATEGORY_NAME_LENGTH)
}

fn validate_optional_text(
    value: Option<&str>,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong { field, max }),
        Some(v) => Ok(Some(v.to_string())),
    }
}

/// Blank notes collapse to `None`
pub fn validate_notes(notes: Option<&str>) -> Result<Option<String>, ValidationError> {
    validate_optional_text(notes, "Notes", MAX_NOTES_LENGTH)
}

/// Blank descriptions collapse to `None`
pub fn validate_description(description: Option<&str>) -> Result<Option<String>, ValidationError> {
    validate_optional_text(description, "Description", MAX_NOTES_LENGTH)
}

/// Normalize a scanned or typed code. Scanners may add whitespace and people
/// type lowercase, so the value is trimmed and uppercased before checking.
pub fn validate_code(code: &str) -> Result<String, ValidationError> {
    let normalized = code.trim().to_ascii_uppercase();
    if normalized.len() != CODE_LENGTH || !normalized.chars().all(|c| CODE_ALPHABET.contains(&c))
    {
        return Err(ValidationError::InvalidCode(code.trim().to_string()));
    }
    Ok(normalized)
}

/// Parse a `YYYY-MM-DD` scan date
pub fn parse_scan_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

/// Truncate a string to `max` characters, appending an ellipsis when cut
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let cut: String = value.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}
