//! Core error types for pomo-core.
//!
//! Storage, configuration and statistics failures each get their own enum so
//! callers can tell a missing row apart from a broken database, and a failed
//! weekly query apart from a failed streak query.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomo-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Statistics fetch errors
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
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

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// No session of the requested type exists yet.
    #[error("No {0} session recorded yet")]
    NotFound(String),

    /// A value was rejected before reaching the database, or a stored value
    /// could not be decoded.
    #[error("Invalid session data: {0}")]
    InvalidData(String),

    /// The data directory could not be prepared
    #[error("Data directory error: {0}")]
    Io(#[from] std::io::Error),
}

impl DatabaseError {
    /// True for the "no row of this type" signal used by extend-or-create.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Statistics fetch errors, one per aggregate.
///
/// The display text names the aggregate that failed so a stats view can say
/// which part is missing.
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("failed to connect to the database")]
    Connect(#[source] DatabaseError),

    #[error("failed to fetch all-time stats")]
    AllTime(#[source] DatabaseError),

    #[error("failed to fetch weekly stats")]
    Weekly(#[source] DatabaseError),

    #[error("failed to fetch heatmap stats")]
    Monthly(#[source] DatabaseError),

    #[error("failed to fetch streak stats")]
    Streak(#[source] DatabaseError),
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseBusy
                    || code.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
