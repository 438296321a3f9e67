//! Context persistence
//!
//! The context is the application's schema-validated state carried between
//! invocations. It is read once at the start of a run and written once at
//! the end, through a pluggable codec.
//!
//! # Example
//!
//! ```no_run
//! use curlkit::context::{ContextStore, LoadOutcome};
//! use serde::{Deserialize, Serialize};
//! use std::path::Path;
//!
//! #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
//! struct Context {
//!     access_token: Option<String>,
//! }
//!
//! let store = ContextStore::<Context>::new();
//! let context = match store.load(Path::new(".context.json")).unwrap() {
//!     LoadOutcome::Loaded(context) => context,
//!     _ => Context::default(),
//! };
//! store.save(Path::new(".context.json"), &context).unwrap();
//! ```

pub mod atomic;
pub mod codec;
pub mod errors;
pub mod prompt;
pub mod store;

pub use codec::{ContextCodec, JsonCodec};
pub use errors::{CodecError, ContextError, ContextResult};
pub use prompt::{AutoPrompt, Prompt, StdinPrompt};
pub use store::{ContextStore, ContextValue, LoadOutcome, DEFAULT_CONTEXT_PATH};
