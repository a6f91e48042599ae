//! Core error types for dayboard-core.
//!
//! Errors are grouped per concern (storage, configuration, record validation,
//! calendar parsing) and folded into [`CoreError`] with thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dayboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task record validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Calendar event parsing errors
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    /// A record looked up by id does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored row could not be turned back into a task
    #[error("Corrupt row for task '{id}': {message}")]
    CorruptRow { id: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Task record validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Fixed/flexible time fields are inconsistent
    #[error("Task '{id}' has an invalid time constraint: {message}")]
    TimeConstraint { id: String, message: String },

    /// Flexible window is empty or inverted
    #[error("Invalid window: end ({end}) must be after start ({start})")]
    InvalidWindow {
        start: chrono::NaiveTime,
        end: chrono::NaiveTime,
    },

    /// Enum-like field holds a value outside its closed set
    #[error("Unknown {field} '{value}'")]
    UnknownVariant { field: &'static str, value: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Calendar event parsing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Start time is not `HH:MM`
    #[error("Invalid start time '{0}', expected HH:MM")]
    InvalidTime(String),

    /// Duration is not `<n> hours|minutes`
    #[error("Invalid duration '{0}', expected '<n> hours' or '<n> minutes'")]
    InvalidDuration(String),

    /// A calendar source could not produce events
    #[error("Calendar source '{source_name}' failed: {message}")]
    SourceFailed { source_name: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_wraps_into_core_error() {
        let err: CoreError = ValidationError::UnknownVariant {
            field: "priority",
            value: "Urgent".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Validation error: Unknown priority 'Urgent'");
    }

    #[test]
    fn not_found_message_names_kind_and_id() {
        let err = CoreError::NotFound {
            kind: "task",
            id: "abc".into(),
        };
        assert_eq!(err.to_string(), "task not found: abc");
    }

    #[test]
    fn rusqlite_error_maps_to_query_failed() {
        let err: DatabaseError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));
    }
}
