use crate::error::EngineError;
use crate::model::Command;
use crate::registry::CommandRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetOutcome {
    pub results: Vec<(String, bool)>,
}

impl ResetOutcome {
    pub fn all_resolved(&self) -> bool {
        self.results.iter().all(|(_, resolved)| *resolved)
    }
}

/// Rank of each identifier; unresolved identifiers report 0.
pub fn get<S: AsRef<str>>(
    registry: &CommandRegistry,
    identifiers: &[S],
) -> Result<Vec<u64>, EngineError> {
    if identifiers.is_empty() {
        return Err(EngineError::Validation(
            "no identifiers given to rankings.get".to_string(),
        ));
    }

    Ok(identifiers
        .iter()
        .map(|identifier| {
            registry
                .lookup(identifier.as_ref())
                .map(|command| command.rank)
                .unwrap_or(0)
        })
        .collect())
}

pub fn reset<S: AsRef<str>>(
    registry: &mut CommandRegistry,
    identifiers: &[S],
) -> Result<ResetOutcome, EngineError> {
    if identifiers.is_empty() {
        return Err(EngineError::Validation(
            "no identifiers given to rankings.reset".to_string(),
        ));
    }

    let results = identifiers
        .iter()
        .map(|identifier| {
            let identifier = identifier.as_ref();
            let resolved = match registry.lookup_mut(identifier) {
                Some(command) => {
                    command.rank = 0;
                    true
                }
                None => false,
            };
            (identifier.to_string(), resolved)
        })
        .collect();

    Ok(ResetOutcome { results })
}

pub fn clear(registry: &mut CommandRegistry) {
    for command in registry.commands_mut() {
        command.rank = 0;
    }
}

pub fn increment(command: &mut Command) {
    command.rank = command.rank.saturating_add(1);
}

#[cfg(test)]
mod tests {
    use super::{clear, get, increment, reset};
    use crate::model::{Command, CommandSet};
    use crate::registry::CommandRegistry;

    fn fixture() -> CommandRegistry {
        CommandRegistry::from_set(
            CommandSet::new()
                .with("a", Command::new("Open File").with_rank(3))
                .with("b", Command::new("Save File").with_aliases(&["Save"]).with_rank(1)),
        )
    }

    #[test]
    fn get_reports_zero_for_unknown_identifiers() {
        let registry = fixture();
        assert_eq!(get(&registry, &["Open File", "Save", "nope"]).unwrap(), vec![3, 1, 0]);
        assert!(get::<&str>(&registry, &[]).is_err());
    }

    #[test]
    fn reset_reports_per_identifier_resolution() {
        let mut registry = fixture();
        let outcome = reset(&mut registry, &["Open File", "missing"]).unwrap();
        assert!(!outcome.all_resolved());
        assert_eq!(
            outcome.results,
            vec![("Open File".to_string(), true), ("missing".to_string(), false)]
        );
        assert_eq!(registry.lookup("Open File").unwrap().rank, 0);
        assert_eq!(registry.lookup("Save File").unwrap().rank, 1);
    }

    #[test]
    fn clear_zeroes_every_rank() {
        let mut registry = fixture();
        clear(&mut registry);
        assert!(registry.commands().all(|command| command.rank == 0));
    }

    #[test]
    fn increment_starts_at_one() {
        let mut command = Command::new("Fresh");
        increment(&mut command);
        assert_eq!(command.rank, 1);
        increment(&mut command);
        assert_eq!(command.rank, 2);
    }
}
