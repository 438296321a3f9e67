//! TOML configuration parsing.

use crate::cli::error::{CurlerError, CurlerResult};
use crate::cli::resolver::Bindings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Engine configuration
///
/// ```toml
/// context_path = ".context.json"
/// timeout_seconds = 30
///
/// [app]
/// name = "httpbin"
/// about = "Talk to httpbin"
///
/// [bindings]
/// base_url = "https://httpbin.org"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Program metadata
    #[serde(default)]
    pub app: AppSection,

    /// Default context file path
    #[serde(default)]
    pub context_path: Option<PathBuf>,

    /// Per-request timeout for the request client (seconds)
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Fixed bindings
    #[serde(default)]
    pub bindings: Bindings,
}

/// Program metadata section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    /// Program name
    pub name: Option<String>,
    /// About text
    pub about: Option<String>,
    /// Version string
    pub version: Option<String>,
}

impl EngineConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> CurlerResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| CurlerError::config(format!("Failed to parse TOML config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> CurlerResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CurlerError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load the file if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> CurlerResult<Self> {
        if path.exists() {
            Self::from_toml_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Request timeout, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn validate(&self) -> CurlerResult<()> {
        if self.timeout_seconds == Some(0) {
            return Err(CurlerError::config("timeout_seconds must be greater than zero"));
        }
        for name in self.bindings.keys() {
            if !crate::cli::params::is_identifier(name) {
                return Err(CurlerError::config(format!(
                    "Binding '{}' is not a valid parameter name",
                    name
                )));
            }
        }
        Ok(())
    }
}
