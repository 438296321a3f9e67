//! Header hook and provider
//!
//! The hook computes request headers from the current context before every
//! action call. It sees the held context read-only; actions get their own
//! mutable copy afterwards.

use super::error::CurlerResult;
use super::params::HookSpec;
use super::resolver::{Bindings, ParameterResolver, ResolvedArgs};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Computed request headers
pub type Headers = BTreeMap<String, String>;

type HeaderHookFn<C> = Arc<dyn Fn(&C, &ResolvedArgs) -> Headers + Send + Sync>;

/// Header hook: descriptor plus computation
pub struct HeaderHook<C> {
    spec: HookSpec,
    compute: HeaderHookFn<C>,
}

impl<C> Clone for HeaderHook<C> {
    fn clone(&self) -> Self {
        Self {
            spec: self.spec.clone(),
            compute: Arc::clone(&self.compute),
        }
    }
}

impl<C> HeaderHook<C> {
    /// Create a hook; the descriptor is validated
    pub fn new<F>(spec: HookSpec, compute: F) -> CurlerResult<Self>
    where
        F: Fn(&C, &ResolvedArgs) -> Headers + Send + Sync + 'static,
    {
        spec.validate()?;
        Ok(Self {
            spec,
            compute: Arc::new(compute),
        })
    }

    /// The hook's descriptor
    pub fn spec(&self) -> &HookSpec {
        &self.spec
    }
}

/// Computes headers for the current invocation
pub struct HeaderProvider<'h, C> {
    hook: Option<&'h HeaderHook<C>>,
}

impl<'h, C> HeaderProvider<'h, C> {
    /// Provider over an optional hook
    pub fn new(hook: Option<&'h HeaderHook<C>>) -> Self {
        Self { hook }
    }

    /// Resolve the hook's parameters and compute headers.
    ///
    /// Without a hook the result is empty.
    pub fn compute(&self, fixed: &Bindings, user: &Bindings, context: &C) -> CurlerResult<Headers> {
        let Some(hook) = self.hook else {
            return Ok(Headers::new());
        };

        let args = ParameterResolver::resolve(HookSpec::OWNER, &hook.spec.params, fixed, user)?;
        let headers = (hook.compute)(context, &args);
        tracing::debug!(count = headers.len(), "computed request headers");
        Ok(headers)
    }
}
