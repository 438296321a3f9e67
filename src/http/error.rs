//! Error types for the request client

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Result type for request client operations
pub type HttpResult<T> = Result<T, HttpError>;

/// Errors raised by the request client
#[derive(Debug, Error)]
pub enum HttpError {
    /// A computed header could not be turned into an HTTP header
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader {
        /// Header name as computed
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// The server answered with a 4xx or 5xx status
    #[error("HTTP status {status} for {url}")]
    Status {
        /// Response status
        status: StatusCode,
        /// Request URL
        url: String,
        /// Decoded response body
        body: Value,
    },

    /// Transport-level failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request body could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HttpError {
    /// Status code carried by a status failure
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }
}
