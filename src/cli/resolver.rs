//! Parameter resolution
//!
//! Each declared parameter is bound from three layers. Later layers win:
//!
//! 1. the parameter's declared default
//! 2. the engine's fixed bindings
//! 3. the user's command-line input
//!
//! A parameter that none of the layers supplies is an error.

use super::error::{CurlerError, CurlerResult};
use super::params::{ParamSpec, RESERVED_PARAMS};
use anyhow::{anyhow, Context};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

/// Name-to-value mapping used for fixed bindings and user input
pub type Bindings = BTreeMap<String, Value>;

/// Final arguments for one call, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedArgs {
    values: Vec<(String, Value)>,
}

impl ResolvedArgs {
    /// Raw value of a resolved parameter
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Whether the parameter was resolved
    pub fn contains(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    /// String value of a resolved parameter
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }

    /// Typed value of a resolved parameter.
    ///
    /// Command-line input always arrives as a string; when a string does not
    /// deserialize as `T` directly it is parsed as JSON text, so `--count 3`
    /// can be read as a number.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> anyhow::Result<T> {
        let value = self
            .value(name)
            .ok_or_else(|| anyhow!("Parameter '{}' was not resolved", name))?;

        match serde_json::from_value::<T>(value.clone()) {
            Ok(typed) => Ok(typed),
            Err(err) => match value {
                Value::String(text) => serde_json::from_str(text)
                    .with_context(|| format!("Parameter '{}' has an unexpected type", name)),
                _ => Err(err).with_context(|| format!("Parameter '{}' has an unexpected type", name)),
            },
        }
    }

    /// Iterate over resolved parameters in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of resolved parameters
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameters were resolved
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Compute the argument mapping for one descriptor
pub struct ParameterResolver;

impl ParameterResolver {
    /// Resolve every declared parameter of `owner`.
    ///
    /// A `null` user value counts as absent, the same as an omitted flag.
    pub fn resolve(
        owner: &str,
        params: &[ParamSpec],
        fixed: &Bindings,
        user: &Bindings,
    ) -> CurlerResult<ResolvedArgs> {
        let mut values = Vec::with_capacity(params.len());

        for param in params {
            if RESERVED_PARAMS.contains(&param.name.as_str()) {
                continue;
            }

            let mut resolved = param.default.clone();

            if let Some(value) = fixed.get(&param.name) {
                resolved = Some(value.clone());
            }

            if let Some(value) = user.get(&param.name).filter(|v| !v.is_null()) {
                resolved = Some(value.clone());
            }

            match resolved {
                Some(value) => values.push((param.name.clone(), value)),
                None => {
                    return Err(CurlerError::MissingRequiredParameter {
                        owner: owner.to_string(),
                        name: param.name.clone(),
                    })
                }
            }
        }

        Ok(ResolvedArgs { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bindings(pairs: &[(&str, Value)]) -> Bindings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_declared_default_used_when_nothing_else() {
        let params = vec![ParamSpec::optional("optional_param", "default")];
        let args =
            ParameterResolver::resolve("a", &params, &Bindings::new(), &Bindings::new()).unwrap();
        assert_eq!(args.get_str("optional_param"), Some("default"));
    }

    #[test]
    fn test_fixed_binding_beats_default() {
        let params = vec![ParamSpec::optional("base_url", "http://default")];
        let fixed = bindings(&[("base_url", json!("http://fixed"))]);
        let args = ParameterResolver::resolve("a", &params, &fixed, &Bindings::new()).unwrap();
        assert_eq!(args.get_str("base_url"), Some("http://fixed"));
    }

    #[test]
    fn test_user_input_beats_fixed_binding() {
        let params = vec![ParamSpec::required("base_url")];
        let fixed = bindings(&[("base_url", json!("http://fixed"))]);
        let user = bindings(&[("base_url", json!("http://user"))]);
        let args = ParameterResolver::resolve("a", &params, &fixed, &user).unwrap();
        assert_eq!(args.get_str("base_url"), Some("http://user"));
    }

    #[test]
    fn test_null_user_value_is_absent() {
        let params = vec![ParamSpec::optional("token", "123")];
        let user = bindings(&[("token", Value::Null)]);
        let args = ParameterResolver::resolve("a", &params, &Bindings::new(), &user).unwrap();
        assert_eq!(args.get_str("token"), Some("123"));
    }

    #[test]
    fn test_missing_required_parameter() {
        let params = vec![ParamSpec::required("required_param")];
        let err = ParameterResolver::resolve("has_required_param", &params, &Bindings::new(), &Bindings::new())
            .unwrap_err();
        match err {
            CurlerError::MissingRequiredParameter { owner, name } => {
                assert_eq!(owner, "has_required_param");
                assert_eq!(name, "required_param");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_undeclared_inputs_are_ignored() {
        let params = vec![ParamSpec::optional("token", "123")];
        let fixed = bindings(&[("base_url", json!("http://fixed"))]);
        let user = bindings(&[("header_param", json!("x"))]);
        let args = ParameterResolver::resolve("a", &params, &fixed, &user).unwrap();
        assert_eq!(args.len(), 1);
        assert!(!args.contains("base_url"));
        assert!(!args.contains("header_param"));
    }

    #[test]
    fn test_declaration_order_preserved() {
        let params = vec![
            ParamSpec::optional("zeta", 1),
            ParamSpec::optional("alpha", 2),
        ];
        let args =
            ParameterResolver::resolve("a", &params, &Bindings::new(), &Bindings::new()).unwrap();
        let names: Vec<&str> = args.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_typed_access_parses_cli_strings() {
        let params = vec![
            ParamSpec::required("count"),
            ParamSpec::optional("limit", 10),
            ParamSpec::required("name"),
        ];
        let user = bindings(&[("count", json!("3")), ("name", json!("alice"))]);
        let args = ParameterResolver::resolve("a", &params, &Bindings::new(), &user).unwrap();

        assert_eq!(args.get::<u32>("count").unwrap(), 3);
        assert_eq!(args.get::<u64>("limit").unwrap(), 10);
        assert_eq!(args.get::<String>("name").unwrap(), "alice");
        assert!(args.get::<u32>("name").is_err());
        assert!(args.get::<String>("missing").is_err());
    }
}
