//! Error types for the action engine

use crate::context::{CodecError, ContextError};
use crate::http::HttpError;
use thiserror::Error;

/// Result type for engine operations
pub type CurlerResult<T> = Result<T, CurlerError>;

/// Errors that can occur while registering or running actions
#[derive(Debug, Error)]
pub enum CurlerError {
    /// An action with the same name is already registered
    #[error("Action '{0}' is already registered")]
    DuplicateAction(String),

    /// The looked-up action is not registered
    #[error("Action '{0}' not found")]
    ActionNotFound(String),

    /// No default, fixed binding or user value supplied a parameter
    #[error("Missing required parameter '{name}' for {owner}")]
    MissingRequiredParameter {
        /// Action name, or `headers` for the header hook
        owner: String,
        /// Parameter name
        name: String,
    },

    /// A descriptor declared `client` or `context`
    #[error("Parameter '{name}' of {owner} is reserved and supplied by the engine")]
    ReservedParameter {
        /// Action name, or `headers` for the header hook
        owner: String,
        /// Parameter name
        name: String,
    },

    /// Parameter names must be identifiers so flag names map back losslessly
    #[error("Invalid parameter name '{0}': must start with a letter or underscore and contain only alphanumerics or underscores")]
    InvalidParameterName(String),

    /// The same parameter was declared twice in one descriptor
    #[error("Parameter '{name}' declared twice by {owner}")]
    DuplicateParameter {
        /// Action name, or `headers` for the header hook
        owner: String,
        /// Parameter name
        name: String,
    },

    /// Invalid action name
    #[error("Invalid action name '{0}'")]
    InvalidActionName(String),

    /// The context file failed validation and nobody could confirm the fallback
    #[error("Context file {path} is invalid: {source}")]
    ContextValidation {
        /// Context file path
        path: String,
        /// Underlying codec failure
        #[source]
        source: CodecError,
    },

    /// Context file could not be written
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Request client construction failure
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Argument parsing failure, or a help/version display request
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// Failure raised by an action body, propagated unmodified
    #[error(transparent)]
    Action(anyhow::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CurlerError {
    /// Create a config error with context
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Process exit status for this error.
    ///
    /// Parse failures follow the parser convention (2, or 0 for help/version
    /// display); everything else is a plain failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(err) => err.exit_code(),
            _ => 1,
        }
    }

    /// The original action failure, if this error came from an action body
    pub fn action_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Action(err) => Some(err),
            _ => None,
        }
    }
}
