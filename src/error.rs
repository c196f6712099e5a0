//! Error types for the tracker.
//!
//! Storage faults (`Database`, `Io`, `Json`) are fatal for an interactive
//! session. Everything else is a domain or input error the operator can
//! correct and retry.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Issue #{id} not found")]
    IssueNotFound { id: i64 },

    #[error("User #{id} not found")]
    UserNotFound { id: i64 },

    /// A write referenced a row that does not exist.
    #[error("Referenced {entity} #{id} does not exist")]
    ReferenceNotFound { entity: &'static str, id: i64 },

    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Invalid status '{value}'. Must be one of: OPEN, IN_PROGRESS, RESOLVED, CLOSED")]
    InvalidStatus { value: String },

    #[error("Invalid priority '{value}'. Must be one of: High, Medium, Low")]
    InvalidPriority { value: String },

    #[error("Invalid number for {field}: '{input}'")]
    InvalidNumber { field: &'static str, input: String },
}

impl TrackerError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// True when the error comes from storage or the terminal rather than
    /// from operator input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Io(_) | Self::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
