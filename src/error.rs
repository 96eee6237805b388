//! Error types for title-pipe
//!
//! Only failures that stop the pipeline from starting are represented here.
//! Per-URL failures travel inside [`crate::FetchResult`] instead.

use thiserror::Error;

/// Result type alias for title-pipe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that prevent a pipeline run
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration value
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
        /// The configuration key that caused the error (e.g. "workers")
        key: Option<String>,
    },

    /// I/O error while opening the config or input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration file
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The shared HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl Error {
    /// Shorthand for a configuration error tied to one key
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}
