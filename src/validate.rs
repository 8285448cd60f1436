//! Field validation shared by the entity setters.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Accepted due date layout.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// A field value that does not satisfy its format contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Due date must be in YYYY-MM-DD format (e.g., 2024-12-31), got '{0}'")]
    InvalidDueDate(String),

    #[error("Status must be one of: pending, in_progress, completed (got '{0}')")]
    InvalidStatus(String),

    #[error("Invalid {kind} id '{value}': must be a positive integer")]
    InvalidId { kind: &'static str, value: String },
}

/// Trim `value` and reject it when nothing is left.
pub fn title(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

pub fn email(value: &str) -> Result<String, ValidationError> {
    if !EMAIL_RE.is_match(value) {
        return Err(ValidationError::InvalidEmail(value.to_string()));
    }
    Ok(value.to_string())
}

/// Accept only calendar dates that actually exist.
pub fn due_date(value: &str) -> Result<String, ValidationError> {
    NaiveDate::parse_from_str(value, DUE_DATE_FORMAT)
        .map(|_| value.to_string())
        .map_err(|_| ValidationError::InvalidDueDate(value.to_string()))
}
