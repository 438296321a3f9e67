//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Level used when neither `RUST_LOG` nor the caller picks one
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Build the filter: `RUST_LOG` if set and valid, otherwise `fallback`
pub fn resolve_filter(rust_log: Option<&str>, fallback: Option<&str>) -> EnvFilter {
    let fallback = fallback.unwrap_or(DEFAULT_LOG_LEVEL);
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(fallback).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Install a fmt subscriber writing to stderr so stdout stays clean for
/// action output.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging(level: Option<&str>) -> bool {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = resolve_filter(rust_log.as_deref(), level);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_filter_prefers_rust_log() {
        let filter = resolve_filter(Some("debug"), Some("error"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_filter_falls_back() {
        let filter = resolve_filter(None, Some("info"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));

        let filter = resolve_filter(None, None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_second_init_is_harmless() {
        let _ = init_logging(Some("error"));
        assert!(!init_logging(Some("error")));
    }
}
