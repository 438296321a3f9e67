//! Action results and their rendering

use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;

/// Value returned by an action body
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutput {
    /// Structured payload, rendered as JSON
    Structured(Value),
    /// Value without a structured form, rendered as plain text
    Unstructured(String),
    /// Nothing to show
    Empty,
}

impl ActionOutput {
    /// Structured output from any JSON value
    pub fn json(value: impl Into<Value>) -> Self {
        Self::Structured(value.into())
    }

    /// Plain-text output
    pub fn text(text: impl Into<String>) -> Self {
        Self::Unstructured(text.into())
    }

    /// Serialize `value`, falling back to its `Display` form when it has no
    /// JSON representation
    pub fn from_serialize<T: Serialize + Display + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => Self::Structured(json),
            Err(_) => Self::Unstructured(value.to_string()),
        }
    }

    /// Structured payload, if any
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Structured(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Value> for ActionOutput {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

impl From<String> for ActionOutput {
    fn from(text: String) -> Self {
        Self::Unstructured(text)
    }
}

impl From<()> for ActionOutput {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

/// Renders an action's output for the terminal
pub trait OutputFormatter: Send + Sync {
    /// Text to print, or `None` to print nothing
    fn format(&self, output: &ActionOutput) -> Option<String>;
}

/// Pretty-printed JSON, plain text for unstructured values
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format(&self, output: &ActionOutput) -> Option<String> {
        match output {
            ActionOutput::Structured(value) => {
                Some(serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()))
            }
            ActionOutput::Unstructured(text) => Some(text.clone()),
            ActionOutput::Empty => None,
        }
    }
}

/// Formatter that prints nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentFormatter;

impl OutputFormatter for SilentFormatter {
    fn format(&self, _output: &ActionOutput) -> Option<String> {
        None
    }
}

impl<F> OutputFormatter for F
where
    F: Fn(&ActionOutput) -> Option<String> + Send + Sync,
{
    fn format(&self, output: &ActionOutput) -> Option<String> {
        self(output)
    }
}
