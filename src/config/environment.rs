//! Environment variable loading and management.

use crate::cli::resolver::Bindings;
use serde_json::Value;
use std::env;
use std::path::Path;

/// Prefix of environment variables that become fixed bindings
pub const BIND_PREFIX: &str = "CURLKIT_BIND_";

/// Loads environment variables from a .env file and the process environment.
#[derive(Debug, Clone)]
pub struct EnvironmentLoader {
    env_file: Option<String>,
}

impl EnvironmentLoader {
    /// Initialize the environment loader.
    ///
    /// # Arguments
    /// * `env_file` - Path to a .env file. Only an explicitly given file is
    ///   loaded, so tests never pick up a stray `.env`.
    pub fn new(env_file: Option<&Path>) -> Self {
        if let Some(path) = env_file {
            if path.exists() {
                if let Err(e) = dotenv::from_path(path) {
                    tracing::warn!(path = %path.display(), error = %e, "failed to load .env file");
                }
            }
        }

        Self {
            env_file: env_file.map(|p| p.to_string_lossy().to_string()),
        }
    }

    /// The .env file this loader was given
    pub fn env_file(&self) -> Option<&str> {
        self.env_file.as_deref()
    }

    /// Fixed bindings from `CURLKIT_BIND_<NAME>` variables.
    ///
    /// `CURLKIT_BIND_BASE_URL=https://x` binds `base_url`.
    pub fn bindings(&self) -> Bindings {
        bindings_from(env::vars())
    }
}

impl Default for EnvironmentLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

fn bindings_from(vars: impl IntoIterator<Item = (String, String)>) -> Bindings {
    vars.into_iter()
        .filter_map(|(key, value)| {
            let name = key.strip_prefix(BIND_PREFIX)?.to_ascii_lowercase();
            crate::cli::params::is_identifier(&name).then(|| (name, Value::String(value)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_bindings_from_prefixed_vars() {
        let vars = vec![
            ("CURLKIT_BIND_BASE_URL".to_string(), "https://x".to_string()),
            ("CURLKIT_BIND_".to_string(), "empty".to_string()),
            ("PATH".to_string(), "/usr/bin".to_string()),
        ];
        let bindings = bindings_from(vars);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.get("base_url"), Some(&json!("https://x")));
    }

    #[test]
    fn test_env_file_loading() {
        let dir = TempDir::new().unwrap();
        let env_path = dir.path().join(".env");
        std::fs::write(&env_path, "CURLKIT_BIND_ENV_FILE_TOKEN=from-file\n").unwrap();

        let loader = EnvironmentLoader::new(Some(&env_path));
        assert!(loader.env_file().is_some());
        assert_eq!(
            loader.bindings().get("env_file_token"),
            Some(&json!("from-file"))
        );
        env::remove_var("CURLKIT_BIND_ENV_FILE_TOKEN");
    }

    #[test]
    fn test_default_loader_has_no_file() {
        let loader = EnvironmentLoader::default();
        assert!(loader.env_file().is_none());
    }
}
