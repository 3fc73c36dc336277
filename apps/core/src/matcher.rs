use crate::options::Options;
use crate::registry::CommandRegistry;

/// Collects every alias and name that matches `query`, in registry order.
///
/// Aliases of a command are tested before its name. Results are display
/// strings, so one command can contribute several entries and the same
/// string may appear twice when two commands share it.
pub fn match_commands(registry: &CommandRegistry, query: &str, options: &Options) -> Vec<String> {
    let query = normalize_query(query, options);
    let mut out = Vec::new();

    for command in registry.commands() {
        for alias in &command.aliases {
            if candidate_matches(alias, &query, options) {
                out.push(alias.clone());
            }
        }

        if candidate_matches(&command.name, &query, options) {
            out.push(command.name.clone());
        }
    }

    out
}

pub fn normalize_query(query: &str, options: &Options) -> String {
    if options.case {
        query.to_string()
    } else {
        query.to_lowercase()
    }
}

/// `query` must already be normalized with `normalize_query`.
pub fn candidate_matches(candidate: &str, query: &str, options: &Options) -> bool {
    if options.case {
        test_candidate(candidate, query, options.exact)
    } else {
        test_candidate(&candidate.to_lowercase(), query, options.exact)
    }
}

fn test_candidate(candidate: &str, query: &str, exact: bool) -> bool {
    if exact {
        candidate.starts_with(query)
    } else {
        candidate.contains(query)
    }
}

#[cfg(test)]
mod tests {
    use super::{candidate_matches, match_commands};
    use crate::model::{Command, CommandSet};
    use crate::options::Options;
    use crate::registry::CommandRegistry;

    #[test]
    fn aliases_are_emitted_before_the_name() {
        let registry = CommandRegistry::from_set(
            CommandSet::new().with("a", Command::new("Open File").with_aliases(&["Open", "Reopen"])),
        );
        let matched = match_commands(&registry, "open", &Options::default());
        assert_eq!(matched, vec!["Open", "Reopen", "Open File"]);
    }

    #[test]
    fn case_sensitive_mode_leaves_query_untouched() {
        let options = Options {
            case: true,
            ..Default::default()
        };
        assert!(candidate_matches("Open File", "File", &options));
        assert!(!candidate_matches("Open File", "file", &options));
    }

    #[test]
    fn exact_mode_is_prefix_match() {
        let options = Options {
            exact: true,
            ..Default::default()
        };
        assert!(candidate_matches("Open File", "open", &options));
        assert!(!candidate_matches("Open File", "file", &options));
    }

    #[test]
    fn empty_query_matches_everything() {
        let registry = CommandRegistry::from_set(
            CommandSet::new()
                .with("a", Command::new("One"))
                .with("b", Command::new("Two").with_aliases(&["2"])),
        );
        assert_eq!(
            match_commands(&registry, "", &Options::default()),
            vec!["One", "2", "Two"]
        );
    }
}
