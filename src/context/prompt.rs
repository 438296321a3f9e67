//! Confirmation gate used when the context file fails validation

use colored::*;
use std::io::{self, BufRead, Write};

/// Asks the user a yes/no question
pub trait Prompt: Send + Sync {
    /// Returns `true` when the user confirms
    fn confirm(&self, question: &str) -> io::Result<bool>;
}

/// Interactive prompt on stdin/stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&self, question: &str) -> io::Result<bool> {
        let mut stdout = io::stdout();
        writeln!(stdout, "{}", question.yellow())?;
        write!(stdout, "y/n: ")?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

/// Non-interactive prompt with a fixed answer
#[derive(Debug, Clone, Copy)]
pub struct AutoPrompt(pub bool);

impl Prompt for AutoPrompt {
    fn confirm(&self, question: &str) -> io::Result<bool> {
        tracing::debug!(question, answer = self.0, "answering confirmation automatically");
        Ok(self.0)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
