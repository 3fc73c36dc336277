use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::options::SortStrategy;
use crate::registry::CommandRegistry;

/// Orders `matched` in place. Every strategy is a stable sort, so equal
/// keys keep the order the match engine produced.
pub fn sort_matches(matched: &mut Vec<String>, strategy: SortStrategy, registry: &CommandRegistry) {
    match strategy {
        SortStrategy::Alphabetical => matched.sort_by(|a, b| locale_cmp(a, b)),
        SortStrategy::ReverseAlphabetical => matched.sort_by(|a, b| locale_cmp(b, a)),
        SortStrategy::Rank | SortStrategy::ReverseRank => {
            let table = rank_table(registry, matched);
            let mut ranked: Vec<(u64, String)> = matched
                .drain(..)
                .map(|text| (table.get(text.as_str()).copied().unwrap_or(0), text))
                .collect();
            if strategy == SortStrategy::Rank {
                ranked.sort_by(|a, b| b.0.cmp(&a.0));
            } else {
                ranked.sort_by(|a, b| a.0.cmp(&b.0));
            }
            matched.extend(ranked.into_iter().map(|(_, text)| text));
        }
    }
}

/// Maps each wanted display string to its owner's rank. Names win over
/// aliases; within each, the first command in registry order wins.
fn rank_table<'a>(registry: &'a CommandRegistry, wanted: &[String]) -> HashMap<&'a str, u64> {
    let wanted: HashSet<&str> = wanted.iter().map(String::as_str).collect();
    let mut table = HashMap::new();
    for command in registry.commands() {
        if wanted.contains(command.name.as_str()) {
            table.entry(command.name.as_str()).or_insert(command.rank);
        }
    }
    for command in registry.commands() {
        for alias in &command.aliases {
            if wanted.contains(alias.as_str()) {
                table.entry(alias.as_str()).or_insert(command.rank);
            }
        }
    }
    table
}

/// Dictionary-style comparison: base letters compare first, ignoring case
/// and accents, then lowercase sorts before uppercase, then raw code
/// points decide.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = base_letters(a)
        .flat_map(char::to_lowercase)
        .cmp(base_letters(b).flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }

    let case_order = base_letters(a)
        .zip(base_letters(b))
        .map(|(x, y)| case_rank(x).cmp(&case_rank(y)))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal);
    if case_order != Ordering::Equal {
        return case_order;
    }

    a.cmp(b)
}

/// Canonical decomposition with combining marks dropped, so `é` reads as `e`.
fn base_letters(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd().filter(|c| !is_combining_mark(*c))
}

fn case_rank(c: char) -> u8 {
    if c.is_uppercase() {
        1
    } else {
        0
    }
}
