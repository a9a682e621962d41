//! Error types for the currency tracker
//!
//! Storage-level failures carry a message; the conditions callers are
//! expected to branch on (missing data folder, unknown currency, ...) get
//! their own variants.

use thiserror::Error;

/// The main error type for tracker operations
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Backup errors
    #[error("Backup error: {0}")]
    Backup(String),

    /// No active character, so there is no data folder to read or write
    #[error("No data folder is configured for the active character")]
    DataFolderUnavailable,

    /// The currency id has no display name
    #[error("Unknown currency: {0}")]
    UnknownCurrency(u32),

    /// A single log line could not be parsed
    #[error("Malformed record: {reason}")]
    MalformedRecord { reason: String },

    /// Export format not recognised
    #[error("Unsupported export format: {0}")]
    UnsupportedExportFormat(String),

    /// Backup requested without a data folder
    #[error("Cannot back up: data folder is not set")]
    EmptyDataFolder,
}

impl TrackerError {
    /// Create a malformed record error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
        }
    }

    /// Check if this is a missing data folder error
    pub fn is_data_folder_unavailable(&self) -> bool {
        matches!(self, Self::DataFolderUnavailable)
    }

    /// Check if this is a malformed record error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedRecord { .. })
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;
