//! Error types for pick-list risk runs.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to the caller.
///
/// Row-level defects (missing pick-list code, unparseable stage-by time) are
/// not errors; those rows are dropped while classifying.
#[derive(Error, Debug)]
pub enum Error {
    /// Captured text has no field or row separators at all
    #[error("Captured text did not look like CSV data")]
    NotTabular,

    /// Text parsed to zero rows
    #[error("Empty CSV")]
    EmptyInput,

    /// Header row has no usable column names
    #[error("CSV header row could not be interpreted")]
    MissingHeader,

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config file write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}
