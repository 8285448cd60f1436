//! Error types for projman
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad input, validation failure, unknown user/project/task)
//! - 4: Operation failed (filesystem error, unreadable store)

use std::path::PathBuf;
use thiserror::Error;

use crate::ids::{ProjectId, TaskId};
use crate::validate::ValidationError;

/// Exit codes for the projman CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for projman operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A user with email {0} already exists")]
    DuplicateEmail(String),

    #[error("User {0} not found")]
    UserNotFound(String),

    #[error("Project with ID {0} not found")]
    ProjectNotFound(ProjectId),

    #[error("Task with ID {0} not found")]
    TaskNotFound(TaskId),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("{path} contains invalid data: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    #[error("No data file to backup at {0}")]
    NothingToBackup(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::Validation(_)
            | Error::DuplicateEmail(_)
            | Error::UserNotFound(_)
            | Error::ProjectNotFound(_)
            | Error::TaskNotFound(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::CorruptStore { .. }
            | Error::NothingToBackup(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Short machine-readable class of the error
    pub fn kind(&self) -> &'static str {
        match self.exit_code() {
            exit_codes::USER_ERROR => "user_error",
            _ => "operation_failed",
        }
    }

    /// Structured context for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        use serde_json::json;

        match self {
            Error::Validation(err) => Some(json!({ "message": err.to_string() })),
            Error::DuplicateEmail(email) => Some(json!({ "email": email })),
            Error::UserNotFound(user) => Some(json!({ "user": user })),
            Error::ProjectNotFound(id) => Some(json!({ "project_id": id.get() })),
            Error::TaskNotFound(id) => Some(json!({ "task_id": id.get() })),
            Error::InvalidConfig(message) => Some(json!({ "message": message })),
            Error::CorruptStore { path, reason } => Some(json!({
                "path": path.to_string_lossy(),
                "reason": reason,
            })),
            Error::NothingToBackup(path) => Some(json!({ "path": path.to_string_lossy() })),
            _ => None,
        }
    }
}

/// Result type alias for projman operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
            details: err.details(),
        }
    }
}
