//! Error types for context persistence

use thiserror::Error;

/// Result type for context store operations
pub type ContextResult<T> = Result<T, ContextError>;

/// Failure of the structured-value codec
#[derive(Debug, Error)]
pub enum CodecError {
    /// Text did not parse or did not match the context schema
    #[error("Context failed validation: {0}")]
    Invalid(String),

    /// The context could not be rendered as text
    #[error("Context could not be encoded: {0}")]
    Encode(String),
}

/// Errors raised while loading or saving the context file
#[derive(Debug, Error)]
pub enum ContextError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Codec error
    #[error(transparent)]
    Codec(#[from] CodecError),
}
