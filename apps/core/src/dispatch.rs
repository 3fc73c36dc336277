use std::collections::HashMap;
use std::sync::Arc;

use crate::error::EngineError;
use crate::logging;
use crate::model::{Callback, CallbackFn};
use crate::options::Options;
use crate::ranking;
use crate::registry::CommandRegistry;

/// Resolves string callbacks declared in command data to something callable.
pub trait DispatchTarget: Send + Sync {
    /// Invokes the function registered as `callback`, passing the identifier
    /// the user selected. Returns `false` when no such function exists.
    fn invoke(&self, callback: &str, identifier: &str) -> bool;

    fn provides(&self, callback: &str) -> bool;
}

#[derive(Default, Clone)]
pub struct DispatchTable {
    functions: HashMap<String, CallbackFn>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, f: impl Fn(&str) + Send + Sync + 'static) -> &mut Self {
        self.functions.insert(name.to_string(), Arc::new(f));
        self
    }

    pub fn with(mut self, name: &str, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.register(name, f);
        self
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl DispatchTarget for DispatchTable {
    fn invoke(&self, callback: &str, identifier: &str) -> bool {
        match self.functions.get(callback) {
            Some(f) => {
                f(identifier);
                true
            }
            None => false,
        }
    }

    fn provides(&self, callback: &str) -> bool {
        self.functions.contains_key(callback)
    }
}

/// Resolves `identifier`, bumps the owner's rank when ranking is on, then
/// runs its callback.
///
/// Named callbacks are checked against `target` before the rank changes, so
/// an unresolvable callback leaves the rank untouched.
pub fn execute(
    registry: &mut CommandRegistry,
    options: &Options,
    identifier: &str,
    target: Option<&dyn DispatchTarget>,
) -> Result<(), EngineError> {
    let command = registry
        .lookup_mut(identifier)
        .ok_or_else(|| EngineError::NotFound(identifier.to_string()))?;
    let callback = command
        .callback
        .clone()
        .ok_or_else(|| EngineError::NotFound(format!("{identifier} (no callback)")))?;

    if let Callback::Named(name) = &callback {
        let available = target.is_some_and(|target| target.provides(name));
        if !available {
            return Err(EngineError::NotFound(format!(
                "{identifier} (callback '{name}' is not registered)"
            )));
        }
    }

    if options.ranking {
        ranking::increment(command);
    }
    if options.dev {
        logging::info(&format!(
            "dispatching '{identifier}' to '{}' rank={}",
            command.name, command.rank
        ));
    }

    match callback {
        Callback::Direct(f) => f(identifier),
        Callback::Named(name) => {
            let invoked = target.is_some_and(|target| target.invoke(&name, identifier));
            if !invoked {
                return Err(EngineError::NotFound(format!(
                    "{identifier} (callback '{name}' is not registered)"
                )));
            }
        }
    }
    Ok(())
}
