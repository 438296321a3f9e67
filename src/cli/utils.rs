//! Shared helpers for binaries built on the engine

use super::error::{CurlerError, CurlerResult};
use super::executor::RunOutcome;
use crate::http::HttpError;
use colored::*;
use std::error::Error as _;

/// Display an error with suggestions based on what failed
pub fn display_error_with_suggestions(error: &CurlerError, app_name: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error.to_string().red());

    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("   {}", truncate_with_ellipsis(&cause.to_string(), 200).dimmed());
        source = cause.source();
    }

    let suggestions: &[String] = &match error {
        CurlerError::ContextValidation { path, .. } => vec![
            format!("Fix or remove {}", path),
            format!("Pass --context to point '{}' at another file", app_name),
        ],
        CurlerError::Http(HttpError::InvalidHeader { .. }) => {
            vec!["Check the values produced by the header hook".to_string()]
        }
        CurlerError::Action(err) if is_network_failure(err) => vec![
            "Check your internet connection".to_string(),
            "Verify the API base URL is reachable".to_string(),
        ],
        CurlerError::Io(err) if err.kind() == std::io::ErrorKind::PermissionDenied => vec![
            "Check permissions of the context file and its directory".to_string(),
        ],
        _ => Vec::new(),
    };

    if !suggestions.is_empty() {
        eprintln!("{}", "💡 Suggestions:".blue());
        for suggestion in suggestions {
            eprintln!("   • {}", suggestion);
        }
    }
}

fn is_network_failure(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<HttpError>()
            .map(|http| matches!(http, HttpError::Transport(e) if e.is_connect() || e.is_timeout()))
            .unwrap_or(false)
    })
}

/// Terminate the process with the status a run deserves.
///
/// Parse failures and help/version requests are rendered by clap with its
/// own exit status; other errors print a diagnostic and exit with 1.
pub fn exit_with<C>(result: CurlerResult<RunOutcome<C>>, app_name: &str) -> ! {
    match result {
        Ok(_) => std::process::exit(0),
        Err(CurlerError::Usage(err)) => err.exit(),
        Err(err) => {
            display_error_with_suggestions(&err, app_name);
            std::process::exit(err.exit_code())
        }
    }
}

/// Truncate text with ellipsis if it exceeds max length
pub fn truncate_with_ellipsis(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("a much longer line", 10), "a much ...");
        assert_eq!(truncate_with_ellipsis("ünïcödé text", 8), "ünïcö...");
    }

    #[test]
    fn test_network_failure_detection_ignores_other_errors() {
        let err = anyhow::anyhow!("plain failure");
        assert!(!is_network_failure(&err));
    }
}
