//! Error types for the management store.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while talking to the management processor.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum StoreError {
    /// Raised when the connection settings are incomplete.
    #[error("configuration error: {0}")]
    Config(String),
    /// Raised when a resource path cannot be joined onto the base URL.
    #[error("invalid URL for {path}: {message}")]
    InvalidUrl {
        /// Path or URL that failed to parse.
        path: String,
        /// Parser message.
        message: String,
    },
    /// Raised when the request could not be sent or the body not read.
    #[error("request to {path} failed: {message}")]
    Transport {
        /// Resource path.
        path: String,
        /// Message returned by the HTTP client.
        message: String,
    },
    /// Raised when the resource changed since it was read.
    #[error("{path} was modified by another client; re-run the command")]
    PreconditionFailed {
        /// Resource path.
        path: String,
    },
    /// Raised for any other unsuccessful HTTP status.
    #[error("{path} returned HTTP {status}: {message}")]
    Status {
        /// Resource path.
        path: String,
        /// HTTP status code.
        status: u16,
        /// Response body text.
        message: String,
    },
    /// Raised when a response body is not the expected JSON shape.
    #[error("could not decode {path}: {message}")]
    Decode {
        /// Resource path.
        path: String,
        /// Decoder message.
        message: String,
    },
}

impl From<ConfigError> for StoreError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}
