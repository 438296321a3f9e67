//! Observability utilities.
//!
//! The engine reports every dispatch step through `tracing`. This module
//! installs a subscriber for binaries that want to see those events.
//!
//! # Example
//!
//! ```no_run
//! use curlkit::observability::init_logging;
//!
//! // RUST_LOG wins; "warn" is used when it is unset
//! init_logging(Some("warn"));
//! ```

pub mod logger;

// Re-export main types for convenience
pub use logger::{init_logging, resolve_filter, DEFAULT_LOG_LEVEL};
