//! Loading and saving the context file

use super::atomic;
use super::codec::{ContextCodec, JsonCodec};
use super::errors::{CodecError, ContextResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

/// Default context file name
pub const DEFAULT_CONTEXT_PATH: &str = ".context.json";

/// Bounds every context type satisfies
pub trait ContextValue: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> ContextValue for T where T: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {}

/// Result of reading the context file
#[derive(Debug)]
pub enum LoadOutcome<C> {
    /// The file parsed and validated
    Loaded(C),
    /// No file at the path
    Missing,
    /// The file exists but failed validation
    Invalid(CodecError),
}

/// Reads and writes the context through a codec
pub struct ContextStore<C> {
    codec: Box<dyn ContextCodec<C>>,
}

impl<C: ContextValue> ContextStore<C> {
    /// Store using the JSON codec
    pub fn new() -> Self {
        Self::with_codec(JsonCodec::new())
    }

    /// Store using a custom codec
    pub fn with_codec(codec: impl ContextCodec<C> + 'static) -> Self {
        Self {
            codec: Box::new(codec),
        }
    }

    /// Read and validate the context file.
    ///
    /// A missing file and a file that fails validation are outcomes, not
    /// errors; any other IO failure is returned as an error.
    pub fn load(&self, path: &Path) -> io::Result<LoadOutcome<C>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(LoadOutcome::Missing),
            Err(err) => return Err(err),
        };

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => return Ok(LoadOutcome::Invalid(CodecError::Invalid(err.to_string()))),
        };

        Ok(match self.codec.decode(&text) {
            Ok(context) => LoadOutcome::Loaded(context),
            Err(err) => LoadOutcome::Invalid(err),
        })
    }

    /// Serialize the context and write it atomically
    pub fn save(&self, path: &Path, context: &C) -> ContextResult<()> {
        let text = self.codec.encode(context)?;
        atomic::write_file(path, &text)?;
        Ok(())
    }
}

impl<C: ContextValue> Default for ContextStore<C> {
    fn default() -> Self {
        Self::new()
    }
}
