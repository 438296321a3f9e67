//! Configuration for engine deployments.
//!
//! This module provides configuration loading through TOML files and
//! environment variable management via `.env` files. Both feed the engine's
//! fixed bindings and program metadata.
//!
//! # Example
//!
//! ```no_run
//! use curlkit::config::{EngineConfig, EnvironmentLoader};
//! use std::path::Path;
//!
//! // Load environment variables
//! let env = EnvironmentLoader::new(Some(Path::new(".env")));
//!
//! // Load configuration from TOML
//! let mut config = EngineConfig::from_toml_file(Path::new("config/cli.toml")).unwrap();
//! config.bindings.extend(env.bindings());
//!
//! println!("Context file: {:?}", config.context_path);
//! ```

pub mod config;
pub mod environment;

// Re-export main types for convenience
pub use self::config::{AppSection, EngineConfig};
pub use self::environment::{EnvironmentLoader, BIND_PREFIX};
