//! Error types for the flowrank system.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the flowrank system.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Feed fetch error (transport, non-2xx, malformed payload).
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Required column could not be located in a feed header.
    #[error("Field resolution error: {0}")]
    FieldResolution(String),

    /// Value parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Both markets produced zero usable records for the date.
    #[error("No usable records for {0}")]
    NoData(String),

    /// Report emission error.
    #[error("Report error: {0}")]
    Report(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a fetch error.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Error::Fetch(msg.into())
    }

    /// Create a field resolution error.
    pub fn field_resolution(msg: impl Into<String>) -> Self {
        Error::FieldResolution(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a report error.
    pub fn report(msg: impl Into<String>) -> Self {
        Error::Report(msg.into())
    }
}
