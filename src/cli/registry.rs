//! Action registry
//!
//! Maps action names to their descriptor and handler. Registration order is
//! kept so the generated command surface lists subcommands predictably.

use super::error::{CurlerError, CurlerResult};
use super::output::ActionOutput;
use super::params::ActionSpec;
use super::resolver::ResolvedArgs;
use crate::http::HttpClient;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by an action handler
pub type ActionFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<ActionOutput>> + Send + 'a>>;

/// Everything an action body receives for one call
pub struct ActionCall<'a, C> {
    /// Request client configured with the computed headers
    pub client: &'a HttpClient,
    /// Isolated copy of the context; changes are kept only if the call succeeds
    pub context: &'a mut C,
    /// Resolved parameters
    pub args: &'a ResolvedArgs,
}

type ActionHandlerFn<C> = Arc<dyn for<'a> Fn(ActionCall<'a, C>) -> ActionFuture<'a> + Send + Sync>;

/// A registered action: descriptor plus handler
pub struct Action<C> {
    spec: ActionSpec,
    handler: ActionHandlerFn<C>,
}

impl<C> Clone for Action<C> {
    fn clone(&self) -> Self {
        Self {
            spec: self.spec.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<C> Action<C> {
    /// The action's descriptor
    pub fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    /// The action's name
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Run the handler
    pub fn invoke<'a>(&self, call: ActionCall<'a, C>) -> ActionFuture<'a> {
        (self.handler)(call)
    }
}

/// Registry of actions keyed by name
pub struct ActionRegistry<C> {
    actions: Vec<Action<C>>,
    name_index: HashMap<String, usize>,
}

impl<C> ActionRegistry<C> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            name_index: HashMap::new(),
        }
    }

    /// Register an action.
    ///
    /// The descriptor is validated first; a name that is already taken is
    /// rejected with `DuplicateAction`.
    pub fn register<F>(&mut self, spec: ActionSpec, handler: F) -> CurlerResult<()>
    where
        F: for<'a> Fn(ActionCall<'a, C>) -> ActionFuture<'a> + Send + Sync + 'static,
    {
        spec.validate()?;

        if self.name_index.contains_key(&spec.name) {
            return Err(CurlerError::DuplicateAction(spec.name));
        }

        tracing::debug!(action = %spec.name, params = spec.params.len(), "registered action");

        let idx = self.actions.len();
        self.name_index.insert(spec.name.clone(), idx);
        self.actions.push(Action {
            spec,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    /// Find an action by name
    pub fn lookup(&self, name: &str) -> CurlerResult<&Action<C>> {
        self.name_index
            .get(name)
            .map(|&idx| &self.actions[idx])
            .ok_or_else(|| CurlerError::ActionNotFound(name.to_string()))
    }

    /// Check if an action with the given name exists
    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    /// Iterate over actions in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Action<C>> {
        self.actions.iter()
    }

    /// Action names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    /// Number of registered actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no actions are registered
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<C> Default for ActionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
