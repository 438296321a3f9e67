//! Parameter descriptors for actions and the header hook
//!
//! Every action declares its parameters up front. The engine never inspects
//! handler signatures; the descriptor list is the whole binding contract.

use super::error::{CurlerError, CurlerResult};
use serde_json::Value;

/// Parameter name under which the request client is injected
pub const CLIENT_PARAM: &str = "client";

/// Parameter name under which the context is injected
pub const CONTEXT_PARAM: &str = "context";

/// Names the engine supplies itself; never exposed as flags
pub const RESERVED_PARAMS: [&str; 2] = [CLIENT_PARAM, CONTEXT_PARAM];

/// Flag and subcommand name the parser generates on its own
pub const HELP_NAME: &str = "help";

/// Flag the parser generates once the program has a version
pub const VERSION_NAME: &str = "version";

/// A single declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Parameter name (identifier form, e.g. `base_url`)
    pub name: String,
    /// Declared default, if any
    pub default: Option<Value>,
    /// Extra help text shown before the default/required note
    pub help: Option<String>,
}

impl ParamSpec {
    /// A parameter without a declared default
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            help: None,
        }
    }

    /// A parameter with a declared default
    pub fn optional(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
            help: None,
        }
    }

    /// Attach help text
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Whether the parameter carries its own default
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The command-line flag for this parameter, without leading dashes
    pub fn flag(&self) -> String {
        flag_name(&self.name)
    }
}

/// Descriptor of a registered action
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSpec {
    /// Action name, used as the subcommand name
    pub name: String,
    /// One-line description for help output
    pub about: Option<String>,
    /// Declared parameters, in declaration order
    pub params: Vec<ParamSpec>,
}

impl ActionSpec {
    /// Start a descriptor for the named action
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            params: Vec::new(),
        }
    }

    /// Set the help description
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Declare a parameter
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Find a declared parameter by name
    pub fn find(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Check names, reserved words and duplicates
    pub fn validate(&self) -> CurlerResult<()> {
        if self.name.is_empty()
            || self.name == HELP_NAME
            || self.name.starts_with('-')
            || !self
                .name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(CurlerError::InvalidActionName(self.name.clone()));
        }
        validate_params(&self.name, &self.params)
    }
}

/// Descriptor of the header hook
///
/// Same shape as an action descriptor; only `context` is injected, and the
/// hook has no name of its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookSpec {
    /// Declared parameters, in declaration order
    pub params: Vec<ParamSpec>,
}

impl HookSpec {
    /// Owner label used in error messages
    pub const OWNER: &'static str = "headers";

    /// An empty hook descriptor
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Find a declared parameter by name
    pub fn find(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Check names, reserved words and duplicates
    pub fn validate(&self) -> CurlerResult<()> {
        validate_params(Self::OWNER, &self.params)
    }
}

fn validate_params(owner: &str, params: &[ParamSpec]) -> CurlerResult<()> {
    for (idx, param) in params.iter().enumerate() {
        if RESERVED_PARAMS.contains(&param.name.as_str()) {
            return Err(CurlerError::ReservedParameter {
                owner: owner.to_string(),
                name: param.name.clone(),
            });
        }
        if !is_identifier(&param.name) || param.name == HELP_NAME {
            return Err(CurlerError::InvalidParameterName(param.name.clone()));
        }
        if params[..idx].iter().any(|p| p.name == param.name) {
            return Err(CurlerError::DuplicateParameter {
                owner: owner.to_string(),
                name: param.name.clone(),
            });
        }
    }
    Ok(())
}

/// Reject a `version` parameter, which collides with the parser's
/// `--version` flag on versioned programs
pub fn check_version_clash(params: &[ParamSpec]) -> CurlerResult<()> {
    match params.iter().find(|p| p.name == VERSION_NAME) {
        Some(param) => Err(CurlerError::InvalidParameterName(param.name.clone())),
        None => Ok(()),
    }
}

/// Whether `name` is a valid parameter identifier
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Map a parameter name to its flag name (`base_url` -> `base-url`)
pub fn flag_name(param: &str) -> String {
    param.replace('_', "-")
}

/// Map a flag name back to its parameter name (`base-url` -> `base_url`)
pub fn param_name(flag: &str) -> String {
    flag.replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flag_mapping_is_lossless() {
        for name in ["base_url", "token", "header_param", "a_b_c"] {
            assert!(is_identifier(name));
            assert_eq!(param_name(&flag_name(name)), name);
        }
        assert_eq!(flag_name("optional_param"), "optional-param");
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_identifier("_private"));
        assert!(is_identifier("x1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("base-url"));
        assert!(!is_identifier("with space"));
    }

    #[test]
    fn test_param_constructors() {
        let p = ParamSpec::optional("token", "123");
        assert!(p.has_default());
        assert_eq!(p.default, Some(json!("123")));
        assert_eq!(p.flag(), "token");

        let p = ParamSpec::required("base_url").help("API root");
        assert!(!p.has_default());
        assert_eq!(p.help.as_deref(), Some("API root"));
    }

    #[test]
    fn test_reserved_names_rejected() {
        let spec = ActionSpec::new("login").param(ParamSpec::required("client"));
        assert!(matches!(
            spec.validate(),
            Err(CurlerError::ReservedParameter { .. })
        ));

        let hook = HookSpec::new().param(ParamSpec::optional("context", "x"));
        assert!(matches!(
            hook.validate(),
            Err(CurlerError::ReservedParameter { .. })
        ));
    }

    #[test]
    fn test_parser_generated_names_rejected() {
        let spec = ActionSpec::new("topic").param(ParamSpec::optional("help", "x"));
        assert!(matches!(
            spec.validate(),
            Err(CurlerError::InvalidParameterName(name)) if name == "help"
        ));

        let hook = HookSpec::new().param(ParamSpec::required("help"));
        assert!(matches!(
            hook.validate(),
            Err(CurlerError::InvalidParameterName(_))
        ));

        assert!(matches!(
            ActionSpec::new("help").validate(),
            Err(CurlerError::InvalidActionName(name)) if name == "help"
        ));
    }

    #[test]
    fn test_version_param_only_clashes_when_checked() {
        let params = vec![ParamSpec::optional("version", "v1")];
        assert!(ActionSpec::new("deploy").param(params[0].clone()).validate().is_ok());
        assert!(matches!(
            check_version_clash(&params),
            Err(CurlerError::InvalidParameterName(name)) if name == "version"
        ));
        assert!(check_version_clash(&[ParamSpec::required("tag")]).is_ok());
    }

    #[test]
    fn test_duplicate_and_invalid_params_rejected() {
        let spec = ActionSpec::new("login")
            .param(ParamSpec::required("token"))
            .param(ParamSpec::optional("token", "1"));
        assert!(matches!(
            spec.validate(),
            Err(CurlerError::DuplicateParameter { .. })
        ));

        let spec = ActionSpec::new("login").param(ParamSpec::required("base-url"));
        assert!(matches!(
            spec.validate(),
            Err(CurlerError::InvalidParameterName(_))
        ));
    }

    #[test]
    fn test_action_name_rules() {
        assert!(ActionSpec::new("has_required_param").validate().is_ok());
        assert!(ActionSpec::new("get-user").validate().is_ok());
        assert!(ActionSpec::new("").validate().is_err());
        assert!(ActionSpec::new("--help").validate().is_err());
        assert!(ActionSpec::new("two words").validate().is_err());
    }
}
