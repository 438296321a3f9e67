//! Action engine - registry, parameter binding and dispatch
//!
//! Applications register named actions with an explicit parameter list. The
//! engine derives the command line from those descriptors, resolves every
//! parameter from declared defaults, fixed bindings and user input, and runs
//! the chosen action with a request client and a copy of the context.
//!
//! # Architecture
//!
//! - `params` - action and header hook descriptors, flag naming
//! - `resolver` - three-layer parameter resolution
//! - `registry` - name to action mapping
//! - `headers` - header hook and provider
//! - `builder` - clap command generation
//! - `executor` - the `Curler` engine driving one run
//! - `output` - action results and formatters
//!
//! # Example
//!
//! ```rust,no_run
//! use curlkit::cli::{ActionOutput, ActionSpec, Curler, Headers, HookSpec, ParamSpec};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
//! struct Context {
//!     access_token: Option<String>,
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let cli = Curler::new(Context::default())
//!         .bind("base_url", "https://httpbin.org")
//!         .headers(HookSpec::new(), |ctx: &Context, _args| {
//!             let mut headers = Headers::new();
//!             if let Some(token) = &ctx.access_token {
//!                 headers.insert("Authorization".into(), format!("Bearer {token}"));
//!             }
//!             headers
//!         })?
//!         .action(
//!             ActionSpec::new("bearer").param(ParamSpec::required("base_url")),
//!             |call| {
//!                 Box::pin(async move {
//!                     let base_url: String = call.args.get("base_url")?;
//!                     let response = call.client.get(&format!("{base_url}/bearer")).await?;
//!                     Ok(ActionOutput::json(response.error_for_status()?.body))
//!                 })
//!             },
//!         )?;
//!
//!     cli.run().await?;
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod error;
pub mod executor;
pub mod headers;
pub mod output;
pub mod params;
pub mod registry;
pub mod resolver;
pub mod utils;

// Re-exports for convenience
pub use builder::{AppInfo, CommandSurfaceBuilder, FlagSpec};
pub use error::{CurlerError, CurlerResult};
pub use executor::{Curler, DispatchState, RunOutcome};
pub use headers::{HeaderHook, HeaderProvider, Headers};
pub use output::{ActionOutput, JsonFormatter, OutputFormatter, SilentFormatter};
pub use params::{flag_name, param_name, ActionSpec, HookSpec, ParamSpec};
pub use registry::{Action, ActionCall, ActionFuture, ActionRegistry};
pub use resolver::{Bindings, ParameterResolver, ResolvedArgs};
pub use utils::{display_error_with_suggestions, exit_with};
