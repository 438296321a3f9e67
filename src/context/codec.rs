//! Structured-value codec for the context

use super::errors::CodecError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Validate-and-parse / serialize capability for a context type
pub trait ContextCodec<C>: Send + Sync {
    /// Parse `text`, rejecting anything that does not match the schema of `C`
    fn decode(&self, text: &str) -> Result<C, CodecError>;

    /// Render the context as text
    fn encode(&self, context: &C) -> Result<String, CodecError>;
}

/// JSON codec; the serde derive of `C` is the schema
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Compact, single-line output
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl<C> ContextCodec<C> for JsonCodec
where
    C: Serialize + DeserializeOwned,
{
    fn decode(&self, text: &str) -> Result<C, CodecError> {
        serde_json::from_str(text).map_err(|e| CodecError::Invalid(e.to_string()))
    }

    fn encode(&self, context: &C) -> Result<String, CodecError> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(context)
        } else {
            serde_json::to_string(context)
        };
        encoded.map_err(|e| CodecError::Encode(e.to_string()))
    }
}
