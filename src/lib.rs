//! curlkit - command-line clients for HTTP APIs from a set of named actions
//!
//! An application registers actions, each with an explicit parameter list,
//! and optionally a hook that computes request headers. curlkit turns them
//! into a command line (one subcommand per action, one flag per parameter),
//! resolves parameters from declared defaults, fixed bindings and user input,
//! and carries a schema-validated context between invocations in a file.
//!
//! - **`cli`** - action registry, parameter resolution and the `Curler` engine
//! - **`context`** - context persistence and the validation fallback prompt
//! - **`http`** - request client handed to actions
//! - **`config`** - TOML and `.env` configuration (enabled with the `config` feature)
//! - **`observability`** - tracing subscriber setup (enabled with the `observability` feature)
//!
//! # Features
//!
//! ```toml
//! [dependencies]
//! curlkit = { version = "0.1", default-features = false }
//! # Or everything:
//! curlkit = { version = "0.1", features = ["all"] }
//! ```
//!
//! See [`cli`] for a complete example.

#![warn(missing_docs)]

/// Action engine
pub mod cli;

/// Context persistence
pub mod context;

/// Request client
pub mod http;

/// Configuration management (enabled with the `config` feature)
#[cfg(feature = "config")]
pub mod config;

/// Observability utilities (enabled with the `observability` feature)
#[cfg(feature = "observability")]
pub mod observability;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cli::{
        ActionCall, ActionFuture, ActionOutput, ActionSpec, Bindings, Curler, CurlerError,
        CurlerResult, Headers, HookSpec, ParamSpec, ResolvedArgs, RunOutcome,
    };
    pub use crate::cli::exit_with;
    pub use crate::context::{AutoPrompt, ContextValue, JsonCodec, Prompt};
    pub use crate::http::{HttpClient, HttpError, HttpResponse};

    #[cfg(feature = "config")]
    pub use crate::config::{EngineConfig, EnvironmentLoader};

    #[cfg(feature = "observability")]
    pub use crate::observability::init_logging;
}
