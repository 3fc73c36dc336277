use crate::error::EngineError;
use crate::logging;
use crate::model::{Command, CommandPatch, CommandSet};

/// Ordered mapping from insertion keys to commands.
///
/// Iteration order is insertion order; matching and every tie-break follow it.
/// Name/alias membership is resolved by linear scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandRegistry {
    entries: Vec<(String, Command)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_set(set: CommandSet) -> Self {
        Self {
            entries: set.into_entries(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Command)> {
        self.entries.iter().map(|(key, command)| (key.as_str(), command))
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.entries.iter().map(|(_, command)| command)
    }

    pub(crate) fn commands_mut(&mut self) -> impl Iterator<Item = &mut Command> {
        self.entries.iter_mut().map(|(_, command)| command)
    }

    pub fn get(&self, key: &str) -> Option<&Command> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, command)| command)
    }

    /// Merges each patch into the command stored under its key, or adds a
    /// new command when the key is unknown. The batch is checked up front;
    /// a rejected batch leaves the registry untouched.
    pub fn insert_or_update(
        &mut self,
        patches: Vec<(String, CommandPatch)>,
    ) -> Result<(), EngineError> {
        if patches.is_empty() {
            return Err(EngineError::Validation(
                "no commands given to insert_or_update".to_string(),
            ));
        }
        self.check_new_keys_are_named(&patches)?;

        for (key, patch) in patches {
            if let Some(name) = patch.name.as_deref() {
                self.warn_on_duplicate_name(&key, name);
            }

            if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
                patch.apply_to(existing);
                continue;
            }

            let command = patch.into_command().ok_or_else(|| {
                EngineError::Validation(format!("new command '{key}' is missing a name"))
            })?;
            self.entries.push((key, command));
        }
        Ok(())
    }

    /// Removes the command owning each identifier. Unresolved identifiers
    /// are skipped. Returns how many commands were removed.
    pub fn remove<S: AsRef<str>>(&mut self, identifiers: &[S]) -> Result<usize, EngineError> {
        if identifiers.is_empty() {
            return Err(EngineError::Validation(
                "no identifiers given to remove".to_string(),
            ));
        }

        let mut removed = 0;
        for identifier in identifiers {
            if let Some(index) = self.position(identifier.as_ref()) {
                self.entries.remove(index);
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Discards every command and installs `set` in its place.
    pub fn replace(&mut self, set: CommandSet) -> Result<usize, EngineError> {
        if set.is_empty() {
            return Err(EngineError::Validation(
                "replace requires a non-empty command set".to_string(),
            ));
        }
        self.entries = set.into_entries();
        Ok(self.entries.len())
    }

    pub fn lookup(&self, identifier: &str) -> Option<&Command> {
        self.position(identifier).map(|index| &self.entries[index].1)
    }

    pub fn lookup_mut(&mut self, identifier: &str) -> Option<&mut Command> {
        let index = self.position(identifier)?;
        Some(&mut self.entries[index].1)
    }

    /// Resolution order: exact key, then name, then named callback, then
    /// alias. Each tier returns the first command in registry order.
    fn position(&self, identifier: &str) -> Option<usize> {
        if identifier.is_empty() {
            return None;
        }

        if let Some(index) = self.entries.iter().position(|(key, _)| key == identifier) {
            return Some(index);
        }

        let commands = || self.entries.iter().map(|(_, command)| command);
        commands()
            .position(|command| command.name == identifier)
            .or_else(|| {
                commands().position(|command| {
                    command
                        .callback
                        .as_ref()
                        .and_then(|callback| callback.name())
                        .is_some_and(|name| name == identifier)
                })
            })
            .or_else(|| {
                commands().position(|command| command.aliases.iter().any(|alias| alias == identifier))
            })
    }

    /// A key is new if neither the registry nor an earlier patch in the batch
    /// introduces it; new keys must carry a name.
    fn check_new_keys_are_named(&self, patches: &[(String, CommandPatch)]) -> Result<(), EngineError> {
        let mut seen: Vec<&str> = Vec::new();
        for (key, patch) in patches {
            let known = self.get(key).is_some() || seen.contains(&key.as_str());
            if !known && patch.name.is_none() {
                return Err(EngineError::Validation(format!(
                    "new command '{key}' is missing a name"
                )));
            }
            seen.push(key);
        }
        Ok(())
    }

    fn warn_on_duplicate_name(&self, key: &str, name: &str) {
        let clash = self
            .entries
            .iter()
            .find(|(existing_key, command)| existing_key != key && command.name == name);
        if let Some((existing_key, _)) = clash {
            logging::warn(&format!(
                "command '{key}' reuses the name '{name}' already held by '{existing_key}'"
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CommandRegistry;
    use crate::model::{Command, CommandSet};

    fn fixture() -> CommandRegistry {
        CommandRegistry::from_set(
            CommandSet::new()
                .with("a", Command::new("Open File").with_aliases(&["Open"]).with_callback("openFile"))
                .with("b", Command::new("Save File").with_aliases(&["Save"]).with_callback("saveFile")),
        )
    }

    #[test]
    fn lookup_prefers_key_over_name() {
        let registry = CommandRegistry::from_set(
            CommandSet::new()
                .with("first", Command::new("second"))
                .with("second", Command::new("Other")),
        );
        assert_eq!(registry.lookup("second").unwrap().name, "Other");
    }

    #[test]
    fn lookup_resolves_callback_and_alias() {
        let registry = fixture();
        assert_eq!(registry.lookup("saveFile").unwrap().name, "Save File");
        assert_eq!(registry.lookup("Open").unwrap().name, "Open File");
        assert!(registry.lookup("open").is_none());
        assert!(registry.lookup("").is_none());
    }
}
