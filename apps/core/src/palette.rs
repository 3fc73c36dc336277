use std::sync::{Arc, Mutex};

use crate::dispatch::{self, DispatchTarget};
use crate::error::EngineError;
use crate::loader::{self, CommandSource, LoadError, LoadStatus};
use crate::logging;
use crate::matched::MatchedSet;
use crate::matcher::match_commands;
use crate::model::{Command, CommandPatch, CommandSet};
use crate::options::{OptionKey, Options, OptionsPatch};
use crate::ranking::{self, ResetOutcome};
use crate::registry::CommandRegistry;
use crate::sort::sort_matches;

/// One palette per lock; the engine has no internal synchronization.
pub type SharedPalette = Arc<Mutex<CommandPalette>>;

pub struct CommandPalette {
    source: CommandSource,
    registry: CommandRegistry,
    options: Options,
    matched: MatchedSet,
    status: LoadStatus,
    default_target: Option<Arc<dyn DispatchTarget>>,
}

impl CommandPalette {
    /// Builds a palette and loads `source` once. A failed load leaves the
    /// registry empty and is recorded in `status()`; it is never returned.
    pub fn new(source: impl Into<CommandSource>, options: Options) -> Self {
        let mut palette = Self {
            source: source.into(),
            registry: CommandRegistry::new(),
            options,
            matched: MatchedSet::new(),
            status: LoadStatus::Pending,
            default_target: None,
        };
        palette.reload();
        palette
    }

    pub fn from_commands(commands: CommandSet, options: Options) -> Self {
        Self::new(CommandSource::Inline(commands), options)
    }

    /// Target used by `execute` for named callbacks when none is passed.
    pub fn with_dispatch_target(mut self, target: Arc<dyn DispatchTarget>) -> Self {
        self.default_target = Some(target);
        self
    }

    pub fn set_dispatch_target(&mut self, target: Option<Arc<dyn DispatchTarget>>) {
        self.default_target = target;
    }

    pub fn into_shared(self) -> SharedPalette {
        Arc::new(Mutex::new(self))
    }

    pub fn listen(&mut self, query: &str) -> Vec<String> {
        let mut matched = match_commands(&self.registry, query, &self.options);
        if let Some(strategy) = self.options.sort {
            sort_matches(&mut matched, strategy, &self.registry);
        }
        self.matched.replace(matched);
        self.matched.current().to_vec()
    }

    pub fn matched(&self) -> &[String] {
        self.matched.current()
    }

    pub fn previous_matched(&self) -> &[String] {
        self.matched.previous()
    }

    pub fn changed(&self) -> bool {
        self.matched.changed()
    }

    pub fn execute(&mut self, identifier: &str) -> Result<(), EngineError> {
        let target = self.default_target.clone();
        dispatch::execute(&mut self.registry, &self.options, identifier, target.as_deref())
    }

    /// Like `execute`, but resolves named callbacks against `target`.
    pub fn execute_with(
        &mut self,
        identifier: &str,
        target: &dyn DispatchTarget,
    ) -> Result<(), EngineError> {
        dispatch::execute(&mut self.registry, &self.options, identifier, Some(target))
    }

    pub fn insert_or_update(
        &mut self,
        patches: Vec<(String, CommandPatch)>,
    ) -> Result<(), EngineError> {
        self.registry.insert_or_update(patches)
    }

    pub fn upsert(&mut self, key: &str, patch: impl Into<CommandPatch>) -> Result<(), EngineError> {
        self.registry
            .insert_or_update(vec![(key.to_string(), patch.into())])
    }

    pub fn remove<S: AsRef<str>>(&mut self, identifiers: &[S]) -> Result<usize, EngineError> {
        self.registry.remove(identifiers)
    }

    pub fn replace(&mut self, commands: CommandSet) -> Result<usize, EngineError> {
        self.registry.replace(commands)
    }

    pub fn lookup(&self, identifier: &str) -> Option<&Command> {
        self.registry.lookup(identifier)
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn rankings(&mut self) -> Rankings<'_> {
        Rankings {
            registry: &mut self.registry,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn update_options(&mut self, patch: OptionsPatch) -> Result<&Options, EngineError> {
        self.options.update(patch)
    }

    pub fn reset_options(&mut self, keys: &[OptionKey]) -> Result<&Options, EngineError> {
        self.options.reset(keys)
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn source(&self) -> &CommandSource {
        &self.source
    }

    /// Swaps the command source and reloads. Returns `false` without
    /// touching anything when `source` equals the current one.
    pub fn update_command_list(&mut self, source: impl Into<CommandSource>) -> bool {
        let source = source.into();
        if source == self.source {
            return false;
        }
        self.source = source;
        self.reload();
        true
    }

    pub fn reload(&mut self) -> &LoadStatus {
        self.status = match loader::load(&self.source) {
            Ok(set) => {
                let count = set.len();
                self.registry = CommandRegistry::from_set(set);
                LoadStatus::Loaded(count)
            }
            Err(error) => {
                self.report_load_failure(&error);
                LoadStatus::Failed(error)
            }
        };
        &self.status
    }

    fn report_load_failure(&self, error: &LoadError) {
        logging::warn(&format!("failed to load commands: {error}"));
        if self.options.dev {
            eprintln!("[palette-core] failed to load commands from {:?}: {error}", self.source);
        }
    }
}

/// Rank bookkeeping over a palette's registry.
pub struct Rankings<'a> {
    registry: &'a mut CommandRegistry,
}

impl Rankings<'_> {
    pub fn get<S: AsRef<str>>(&self, identifiers: &[S]) -> Result<Vec<u64>, EngineError> {
        ranking::get(&*self.registry, identifiers)
    }

    pub fn reset<S: AsRef<str>>(&mut self, identifiers: &[S]) -> Result<ResetOutcome, EngineError> {
        ranking::reset(&mut *self.registry, identifiers)
    }

    pub fn clear(&mut self) {
        ranking::clear(&mut *self.registry)
    }
}
