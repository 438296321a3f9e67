//! CLI executor - the `Curler` engine
//!
//! One run parses the command line, loads the context, builds a request
//! client with the computed headers, resolves the action's parameters,
//! invokes it, keeps the context copy if it changed, persists the context
//! and prints the result.
//!
//! Usage: `Curler::new(Context::default()).action(..)?.run().await`

use super::builder::{context_path, extract_user_args, AppInfo, CommandSurfaceBuilder};
use super::error::{CurlerError, CurlerResult};
use super::headers::{HeaderHook, HeaderProvider, Headers};
use super::output::{ActionOutput, JsonFormatter, OutputFormatter};
use super::params::{check_version_clash, ActionSpec, HookSpec};
use super::registry::{ActionCall, ActionFuture, ActionRegistry};
use super::resolver::{Bindings, ParameterResolver, ResolvedArgs};
use crate::context::{ContextCodec, ContextStore, ContextValue, LoadOutcome, Prompt, StdinPrompt};
use crate::http::HttpClient;
use clap::Command;
use colored::*;
use serde_json::Value;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Steps of one run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Parsing the command line
    ParsingArgs,
    /// Reading the context file
    LoadingContext,
    /// Computing headers and building the client
    ResolvingHeaders,
    /// Binding the action's parameters
    ResolvingParams,
    /// Running the action body
    Invoking,
    /// Keeping the context copy if it changed
    CommittingContext,
    /// Writing the context file
    PersistingContext,
    /// Printing the result
    Formatting,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ParsingArgs => "parsing_args",
            Self::LoadingContext => "loading_context",
            Self::ResolvingHeaders => "resolving_headers",
            Self::ResolvingParams => "resolving_params",
            Self::Invoking => "invoking",
            Self::CommittingContext => "committing_context",
            Self::PersistingContext => "persisting_context",
            Self::Formatting => "formatting",
        };
        f.write_str(name)
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome<C> {
    /// No action given; usage was printed
    Help,
    /// The context file was invalid and the fallback was declined
    Aborted,
    /// The action ran and the context was persisted
    Completed {
        /// Action that ran
        action: String,
        /// Context held after the run
        context: C,
        /// Value returned by the action
        output: ActionOutput,
    },
}

impl<C> RunOutcome<C> {
    /// The action's output, if the run completed
    pub fn output(&self) -> Option<&ActionOutput> {
        match self {
            Self::Completed { output, .. } => Some(output),
            _ => None,
        }
    }

    /// The final context, if the run completed
    pub fn context(&self) -> Option<&C> {
        match self {
            Self::Completed { context, .. } => Some(context),
            _ => None,
        }
    }
}

/// Action engine: registry, header hook, fixed bindings and context handling
pub struct Curler<C: ContextValue> {
    app: AppInfo,
    default_context: C,
    fixed: Bindings,
    registry: ActionRegistry<C>,
    hook: Option<HeaderHook<C>>,
    store: ContextStore<C>,
    prompt: Box<dyn Prompt>,
    formatter: Box<dyn OutputFormatter>,
    timeout: Option<Duration>,
}

impl<C: ContextValue> Curler<C> {
    /// Create an engine whose context starts from `default_context`
    pub fn new(default_context: C) -> Self {
        Self {
            app: AppInfo::default(),
            default_context,
            fixed: Bindings::new(),
            registry: ActionRegistry::new(),
            hook: None,
            store: ContextStore::new(),
            prompt: Box::new(StdinPrompt),
            formatter: Box::new(JsonFormatter),
            timeout: None,
        }
    }

    /// Set the program name shown in usage
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.app.name = name.into();
        self
    }

    /// Set the about text
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.app.about = Some(about.into());
        self
    }

    /// Set the version; enables `--version`
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.app.version = Some(version.into());
        self
    }

    /// Default for `--context`
    pub fn context_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.app.context_path = path.into();
        self
    }

    /// Per-request timeout for the request client
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a fixed binding
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fixed.insert(name.into(), value.into());
        self
    }

    /// Add several fixed bindings
    pub fn bindings(mut self, bindings: Bindings) -> Self {
        self.fixed.extend(bindings);
        self
    }

    /// Install the header hook
    pub fn headers<F>(mut self, spec: HookSpec, compute: F) -> CurlerResult<Self>
    where
        F: Fn(&C, &ResolvedArgs) -> Headers + Send + Sync + 'static,
    {
        if self.app.version.is_some() {
            check_version_clash(&spec.params)?;
        }
        self.hook = Some(HeaderHook::new(spec, compute)?);
        Ok(self)
    }

    /// Register an action (builder form)
    pub fn action<F>(mut self, spec: ActionSpec, handler: F) -> CurlerResult<Self>
    where
        F: for<'a> Fn(ActionCall<'a, C>) -> ActionFuture<'a> + Send + Sync + 'static,
    {
        self.register(spec, handler)?;
        Ok(self)
    }

    /// Register an action
    pub fn register<F>(&mut self, spec: ActionSpec, handler: F) -> CurlerResult<()>
    where
        F: for<'a> Fn(ActionCall<'a, C>) -> ActionFuture<'a> + Send + Sync + 'static,
    {
        if self.app.version.is_some() {
            check_version_clash(&spec.params)?;
        }
        self.registry.register(spec, handler)
    }

    /// Replace the output formatter
    pub fn formatter(mut self, formatter: impl OutputFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Replace the confirmation prompt
    pub fn prompt(mut self, prompt: impl Prompt + 'static) -> Self {
        self.prompt = Box::new(prompt);
        self
    }

    /// Replace the context codec
    pub fn codec(mut self, codec: impl ContextCodec<C> + 'static) -> Self {
        self.store = ContextStore::with_codec(codec);
        self
    }

    /// Registered actions
    pub fn registry(&self) -> &ActionRegistry<C> {
        &self.registry
    }

    /// Fixed bindings
    pub fn fixed_bindings(&self) -> &Bindings {
        &self.fixed
    }

    /// The generated clap command
    pub fn command(&self) -> Command {
        self.surface().build()
    }

    /// Reject `version` parameters on a versioned program, whatever order
    /// the builder methods were called in
    fn check_surface(&self) -> CurlerResult<()> {
        if self.app.version.is_none() {
            return Ok(());
        }
        if let Some(hook) = &self.hook {
            check_version_clash(&hook.spec().params)?;
        }
        for action in self.registry.iter() {
            check_version_clash(&action.spec().params)?;
        }
        Ok(())
    }

    fn surface(&self) -> CommandSurfaceBuilder<'_, C> {
        CommandSurfaceBuilder::new(
            &self.app,
            &self.registry,
            self.hook.as_ref().map(HeaderHook::spec),
            &self.fixed,
        )
    }

    /// Run with the process arguments
    pub async fn run(&self) -> CurlerResult<RunOutcome<C>> {
        self.run_from(std::env::args_os()).await
    }

    /// Run on a current-thread runtime, for synchronous `main` functions
    pub fn run_blocking(&self) -> CurlerResult<RunOutcome<C>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run())
    }

    /// Run with the given arguments; the first one is the program name
    pub async fn run_from<I, T>(&self, args: I) -> CurlerResult<RunOutcome<C>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        trace_state(DispatchState::ParsingArgs);
        self.check_surface()?;
        let matches = self.command().try_get_matches_from(args)?;

        let Some((action_name, sub_matches)) = matches.subcommand() else {
            self.command().print_help()?;
            println!();
            return Ok(RunOutcome::Help);
        };

        let action = self.registry.lookup(action_name)?;
        let flags = self.surface().flags_for(action.spec());
        let user = extract_user_args(sub_matches, &flags);
        let path = context_path(&matches);

        trace_state(DispatchState::LoadingContext);
        let Some(context) = self.load_context(&path)? else {
            tracing::info!(path = %path.display(), "run aborted, context left untouched");
            return Ok(RunOutcome::Aborted);
        };

        let (context, output) = self.perform(action_name, &user, context).await?;

        trace_state(DispatchState::PersistingContext);
        self.store.save(&path, &context)?;

        trace_state(DispatchState::Formatting);
        if let Some(text) = self.formatter.format(&output) {
            println!("{}", text);
        }

        Ok(RunOutcome::Completed {
            action: action_name.to_string(),
            context,
            output,
        })
    }

    /// Invoke one action against `context` and return the context to keep
    /// together with the action's output.
    ///
    /// The action works on a copy; the copy replaces `context` only when the
    /// call succeeds and the copy differs. Action failures are returned as
    /// `CurlerError::Action` wrapping the original error.
    pub async fn perform(
        &self,
        action_name: &str,
        user: &Bindings,
        context: C,
    ) -> CurlerResult<(C, ActionOutput)> {
        let action = self.registry.lookup(action_name)?;

        trace_state(DispatchState::ResolvingHeaders);
        let headers = HeaderProvider::new(self.hook.as_ref()).compute(&self.fixed, user, &context)?;
        let client = HttpClient::with_timeout(&headers, self.timeout)?;

        trace_state(DispatchState::ResolvingParams);
        let spec = action.spec();
        let args = ParameterResolver::resolve(&spec.name, &spec.params, &self.fixed, user)?;

        trace_state(DispatchState::Invoking);
        let mut working = context.clone();
        let output = action
            .invoke(ActionCall {
                client: &client,
                context: &mut working,
                args: &args,
            })
            .await
            .map_err(CurlerError::Action)?;

        trace_state(DispatchState::CommittingContext);
        if working != context {
            tracing::debug!(action = action_name, "action changed the context");
            return Ok((working, output));
        }
        Ok((context, output))
    }

    /// Load the context from `path`.
    ///
    /// Returns `None` when the file is invalid and the user declines to
    /// continue with the default context.
    pub fn load_context(&self, path: &Path) -> CurlerResult<Option<C>> {
        match self.store.load(path)? {
            LoadOutcome::Loaded(context) => {
                tracing::debug!(path = %path.display(), "loaded context");
                Ok(Some(context))
            }
            LoadOutcome::Missing => {
                tracing::info!(path = %path.display(), "no context file, using default context");
                eprintln!("{}", "No context file found, using default context.".dimmed());
                Ok(Some(self.default_context.clone()))
            }
            LoadOutcome::Invalid(err) => {
                tracing::warn!(path = %path.display(), error = %err, "invalid context file");
                eprintln!("{} {}", "Invalid context file:".yellow().bold(), err);

                match self.prompt.confirm("Continue with default context?") {
                    Ok(true) => Ok(Some(self.default_context.clone())),
                    Ok(false) => Ok(None),
                    Err(io_err) => {
                        tracing::warn!(error = %io_err, "could not ask for confirmation");
                        Err(CurlerError::ContextValidation {
                            path: path.display().to_string(),
                            source: err,
                        })
                    }
                }
            }
        }
    }

    /// Write the context to `path`
    pub fn save_context(&self, path: &Path, context: &C) -> CurlerResult<()> {
        self.store.save(path, context)?;
        Ok(())
    }
}

#[cfg(feature = "config")]
impl<C: ContextValue> Curler<C> {
    /// Apply program metadata, context path, timeout and fixed bindings
    /// from a loaded configuration
    pub fn with_config(mut self, config: &crate::config::EngineConfig) -> Self {
        if let Some(name) = &config.app.name {
            self.app.name = name.clone();
        }
        if let Some(about) = &config.app.about {
            self.app.about = Some(about.clone());
        }
        if let Some(version) = &config.app.version {
            self.app.version = Some(version.clone());
        }
        if let Some(path) = &config.context_path {
            self.app.context_path = path.clone();
        }
        if let Some(timeout) = config.timeout() {
            self.timeout = Some(timeout);
        }
        self.fixed.extend(config.bindings.clone());
        self
    }
}

fn trace_state(state: DispatchState) {
    tracing::debug!(%state, "dispatch");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::params::ParamSpec;
    use crate::context::AutoPrompt;
    use crate::cli::output::SilentFormatter;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
    }

    fn engine() -> Curler<Counter> {
        Curler::new(Counter::default())
            .name("counter")
            .formatter(SilentFormatter)
            .prompt(AutoPrompt(false))
            .action(ActionSpec::new("bump"), |call| {
                Box::pin(async move {
                    call.context.count += 1;
                    Ok(ActionOutput::json(json!({ "count": call.context.count })))
                })
            })
            .unwrap()
            .action(ActionSpec::new("peek"), |call| {
                Box::pin(async move { Ok(ActionOutput::json(json!(call.context.count))) })
            })
            .unwrap()
            .action(
                ActionSpec::new("fail").param(ParamSpec::optional("reason", "boom")),
                |call| {
                    Box::pin(async move {
                        call.context.count = 999;
                        let reason: String = call.args.get("reason")?;
                        Err(anyhow::anyhow!(reason))
                    })
                },
            )
            .unwrap()
    }

    fn argv<'a>(path: &'a Path, rest: &[&'a str]) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["counter".into(), "--context".into(), path.into()];
        args.extend(rest.iter().map(OsString::from));
        args
    }

    #[tokio::test]
    async fn test_help_when_no_action() {
        let outcome = engine().run_from(["counter"]).await.unwrap();
        assert_eq!(outcome, RunOutcome::Help);
    }

    #[tokio::test]
    async fn test_mutation_committed_and_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ctx.json");
        let engine = engine();

        engine.run_from(argv(&path, &["bump"])).await.unwrap();
        let outcome = engine.run_from(argv(&path, &["bump"])).await.unwrap();

        assert_eq!(outcome.context(), Some(&Counter { count: 2 }));
        assert_eq!(outcome.output(), Some(&ActionOutput::json(json!({"count": 2}))));
        let saved: Counter = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.count, 2);
    }

    #[tokio::test]
    async fn test_unchanged_context_still_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ctx.json");
        fs::write(&path, r#"{"count":7}"#).unwrap();

        let outcome = engine().run_from(argv(&path, &["peek"])).await.unwrap();

        assert_eq!(outcome.output(), Some(&ActionOutput::json(json!(7))));
        let saved: Counter = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, Counter { count: 7 });
    }

    #[tokio::test]
    async fn test_failed_action_does_not_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ctx.json");
        fs::write(&path, r#"{"count":1}"#).unwrap();

        let err = engine()
            .run_from(argv(&path, &["fail", "--reason", "server down"]))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "server down");
        assert_eq!(err.exit_code(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"count":1}"#);
    }

    #[tokio::test]
    async fn test_invalid_context_declined_aborts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ctx.json");
        fs::write(&path, r#"{"count":"many"}"#).unwrap();

        let outcome = engine().run_from(argv(&path, &["bump"])).await.unwrap();

        assert_eq!(outcome, RunOutcome::Aborted);
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"count":"many"}"#);
    }

    #[tokio::test]
    async fn test_invalid_context_confirmed_uses_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ctx.json");
        fs::write(&path, "garbage").unwrap();

        let outcome = engine()
            .prompt(AutoPrompt(true))
            .run_from(argv(&path, &["bump"]))
            .await
            .unwrap();

        assert_eq!(outcome.context(), Some(&Counter { count: 1 }));
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"count":1}"#);
    }

    #[tokio::test]
    async fn test_non_utf8_context_goes_through_prompt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ctx.json");
        fs::write(&path, [0xc3, 0x28]).unwrap();

        let outcome = engine().run_from(argv(&path, &["bump"])).await.unwrap();
        assert_eq!(outcome, RunOutcome::Aborted);
        assert_eq!(fs::read(&path).unwrap(), vec![0xc3, 0x28]);

        let outcome = engine()
            .prompt(AutoPrompt(true))
            .run_from(argv(&path, &["bump"]))
            .await
            .unwrap();
        assert_eq!(outcome.context(), Some(&Counter { count: 1 }));
    }

    #[tokio::test]
    async fn test_unknown_action_is_usage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ctx.json");
        let err = engine().run_from(argv(&path, &["nope"])).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_perform_reports_unknown_action() {
        let err = engine()
            .perform("missing", &Bindings::new(), Counter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CurlerError::ActionNotFound(_)));
    }

    #[test]
    fn test_version_param_rejected_on_versioned_program() {
        let result = Curler::new(Counter::default()).version("1.0.0").action(
            ActionSpec::new("deploy").param(ParamSpec::optional("version", "v1")),
            |_call| Box::pin(async { Ok(ActionOutput::Empty) }),
        );
        assert!(matches!(result, Err(CurlerError::InvalidParameterName(_))));

        let unversioned = Curler::new(Counter::default()).action(
            ActionSpec::new("deploy").param(ParamSpec::optional("version", "v1")),
            |_call| Box::pin(async { Ok(ActionOutput::Empty) }),
        );
        assert!(unversioned.is_ok());
    }

    #[tokio::test]
    async fn test_version_set_after_registration_fails_before_parsing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ctx.json");
        let engine = Curler::new(Counter::default())
            .action(
                ActionSpec::new("deploy").param(ParamSpec::optional("version", "v1")),
                |_call| Box::pin(async { Ok(ActionOutput::Empty) }),
            )
            .unwrap()
            .version("1.0.0");

        let err = engine.run_from(argv(&path, &["deploy"])).await.unwrap_err();
        assert!(matches!(err, CurlerError::InvalidParameterName(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_help_names_rejected_before_running() {
        let result = Curler::new(Counter::default()).action(
            ActionSpec::new("topic").param(ParamSpec::optional("help", "x")),
            |_call| Box::pin(async { Ok(ActionOutput::Empty) }),
        );
        assert!(matches!(result, Err(CurlerError::InvalidParameterName(_))));

        let result = Curler::new(Counter::default())
            .action(ActionSpec::new("help"), |_call| Box::pin(async { Ok(ActionOutput::Empty) }));
        assert!(matches!(result, Err(CurlerError::InvalidActionName(_))));

        let err = engine().run_from(["counter", "bump", "--help"]).await.unwrap_err();
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_dispatch_state_display() {
        assert_eq!(DispatchState::LoadingContext.to_string(), "loading_context");
        assert_eq!(DispatchState::Formatting.to_string(), "formatting");
    }
}
