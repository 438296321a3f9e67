//! Command surface builder - derives the clap command from registered actions

use super::params::{flag_name, ActionSpec, HookSpec, ParamSpec};
use super::registry::ActionRegistry;
use super::resolver::Bindings;
use crate::context::DEFAULT_CONTEXT_PATH;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use serde_json::Value;
use std::path::PathBuf;

/// Id and long name of the top-level context path flag
pub const CONTEXT_FLAG: &str = "context";

/// Environment variable that can supply the context path
pub const CONTEXT_ENV: &str = "CURLKIT_CONTEXT";

/// Program metadata for the generated command
#[derive(Debug, Clone)]
pub struct AppInfo {
    /// Program name shown in usage
    pub name: String,
    /// About text
    pub about: Option<String>,
    /// Version string; enables `--version` when set
    pub version: Option<String>,
    /// Default value of `--context`
    pub context_path: PathBuf,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: "curlkit".to_string(),
            about: None,
            version: None,
            context_path: PathBuf::from(DEFAULT_CONTEXT_PATH),
        }
    }
}

/// One generated flag of a subcommand
#[derive(Debug, Clone, PartialEq)]
pub struct FlagSpec {
    /// Parameter name, also the clap argument id
    pub param: String,
    /// Long flag name
    pub long: String,
    /// Whether the parser requires the flag
    pub required: bool,
    /// Help text
    pub help: String,
}

/// Builds the clap command for all registered actions
pub struct CommandSurfaceBuilder<'a, C> {
    app: &'a AppInfo,
    registry: &'a ActionRegistry<C>,
    hook: Option<&'a HookSpec>,
    fixed: &'a Bindings,
}

impl<'a, C> CommandSurfaceBuilder<'a, C> {
    /// Create a builder over the registry, the optional hook descriptor and
    /// the fixed bindings
    pub fn new(
        app: &'a AppInfo,
        registry: &'a ActionRegistry<C>,
        hook: Option<&'a HookSpec>,
        fixed: &'a Bindings,
    ) -> Self {
        Self {
            app,
            registry,
            hook,
            fixed,
        }
    }

    /// Build the clap Command
    pub fn build(&self) -> Command {
        let mut app = Command::new(self.app.name.clone());

        if let Some(about) = &self.app.about {
            app = app.about(about.clone());
        }

        if let Some(version) = &self.app.version {
            app = app.version(version.clone());
        }

        app = app.arg(
            Arg::new(CONTEXT_FLAG)
                .long(CONTEXT_FLAG)
                .value_name("PATH")
                .help("Path to context file")
                .env(CONTEXT_ENV)
                .default_value(self.app.context_path.to_string_lossy().into_owned())
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath)
                .action(ArgAction::Set),
        );

        for action in self.registry.iter() {
            app = app.subcommand(self.build_subcommand(action.spec()));
        }

        app
    }

    /// Flags of one action: its own parameters followed by the hook's
    /// parameters it does not declare itself
    pub fn flags_for(&self, spec: &ActionSpec) -> Vec<FlagSpec> {
        let hook_params = self.hook.map(|h| h.params.as_slice()).unwrap_or_default();
        let mut flags = Vec::new();

        for param in spec.params.iter().chain(hook_params) {
            if flags.iter().any(|f: &FlagSpec| f.param == param.name) {
                continue;
            }

            let own = spec.find(&param.name);
            let hooked = self.hook.and_then(|h| h.find(&param.name));
            let fixed = self.fixed.get(&param.name);

            let needs_value = [own, hooked].into_iter().flatten().any(|p| !p.has_default());
            let required = needs_value && fixed.is_none();

            // Fixed binding first, then the action's own default, then the hook's.
            let effective_default = fixed
                .or_else(|| own.and_then(|p| p.default.as_ref()))
                .or_else(|| hooked.and_then(|p| p.default.as_ref()));

            flags.push(FlagSpec {
                param: param.name.clone(),
                long: param.flag(),
                required,
                help: help_text(own.or(hooked).unwrap_or(param), required, effective_default),
            });
        }

        flags
    }

    fn build_subcommand(&self, spec: &ActionSpec) -> Command {
        let mut cmd = Command::new(spec.name.clone());

        if let Some(about) = &spec.about {
            cmd = cmd.about(about.clone());
        }

        for flag in self.flags_for(spec) {
            cmd = cmd.arg(
                Arg::new(flag.param.clone())
                    .long(flag.long)
                    .value_name(flag.param.to_uppercase())
                    .help(flag.help)
                    .required(flag.required)
                    .allow_negative_numbers(true)
                    .action(ArgAction::Set),
            );
        }

        cmd
    }
}

fn help_text(param: &ParamSpec, required: bool, default: Option<&Value>) -> String {
    let note = match (required, default) {
        (false, Some(value)) => format!("Default: {}", display_value(value)),
        _ => "Required".to_string(),
    };

    match &param.help {
        Some(help) => format!("{} ({})", help, note),
        None => note,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Collect the flags the user actually gave; omitted flags are left out
pub fn extract_user_args(matches: &ArgMatches, flags: &[FlagSpec]) -> Bindings {
    flags
        .iter()
        .filter_map(|flag| {
            matches
                .try_get_one::<String>(&flag.param)
                .ok()
                .flatten()
                .map(|value| (flag.param.clone(), Value::String(value.clone())))
        })
        .collect()
}

/// Context path chosen on the command line (or its default)
pub fn context_path(matches: &ArgMatches) -> PathBuf {
    matches
        .get_one::<PathBuf>(CONTEXT_FLAG)
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTEXT_PATH))
}

/// Turn a flag name back into a parameter name
pub fn param_for_flag(long: &str) -> String {
    super::params::param_name(long.trim_start_matches("--"))
}
