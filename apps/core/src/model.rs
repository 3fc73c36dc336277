use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub type CallbackFn = Arc<dyn Fn(&str) + Send + Sync>;

/// What a command runs when dispatched.
///
/// `Named` callbacks are plain strings so command sets can live in static
/// data files; they are resolved against a `DispatchTarget` at execute time.
#[derive(Clone)]
pub enum Callback {
    Named(String),
    Direct(CallbackFn),
}

impl Callback {
    pub fn direct(f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self::Direct(Arc::new(f))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Direct(_) => None,
        }
    }
}

impl Debug for Callback {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Direct(_) => f.write_str("Direct(<fn>)"),
        }
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Named(a), Self::Named(b)) => a == b,
            (Self::Direct(a), Self::Direct(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for Callback {
    fn from(value: &str) -> Self {
        Self::Named(value.to_string())
    }
}

impl From<String> for Callback {
    fn from(value: String) -> Self {
        Self::Named(value)
    }
}

impl Serialize for Callback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Named(name) => serializer.serialize_str(name),
            Self::Direct(_) => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Callback {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::Named)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Command {
    pub name: String,
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<Callback>,
    pub rank: u64,
}

impl Command {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            callback: None,
            rank: 0,
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|alias| alias.to_string()).collect();
        self
    }

    pub fn with_callback(mut self, callback: impl Into<Callback>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    pub fn with_rank(mut self, rank: u64) -> Self {
        self.rank = rank;
        self
    }

    /// Name first, then aliases in declaration order.
    pub fn display_strings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    pub fn answers_to(&self, display: &str) -> bool {
        self.display_strings().any(|candidate| candidate == display)
    }
}

/// Partial command used by insert/update; absent fields keep their
/// current values when the key already exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<Callback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u64>,
}

impl CommandPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.aliases.is_none() && self.callback.is_none() && self.rank.is_none()
    }

    pub fn apply_to(self, command: &mut Command) {
        if let Some(name) = self.name {
            command.name = name;
        }
        if let Some(aliases) = self.aliases {
            command.aliases = aliases;
        }
        if let Some(callback) = self.callback {
            command.callback = Some(callback);
        }
        if let Some(rank) = self.rank {
            command.rank = rank;
        }
    }

    pub fn into_command(self) -> Option<Command> {
        let name = self.name?;
        Some(Command {
            name,
            aliases: self.aliases.unwrap_or_default(),
            callback: self.callback,
            rank: self.rank.unwrap_or(0),
        })
    }
}

impl From<Command> for CommandPatch {
    fn from(value: Command) -> Self {
        Self {
            name: Some(value.name),
            aliases: Some(value.aliases),
            callback: value.callback,
            rank: Some(value.rank),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CommandRecord {
    name: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    callback: Option<Callback>,
    #[serde(default)]
    rank: Option<u64>,
}

impl From<CommandRecord> for Command {
    fn from(value: CommandRecord) -> Self {
        Self {
            name: value.name,
            aliases: value.aliases,
            callback: value.callback,
            rank: value.rank.unwrap_or(0),
        }
    }
}

/// Ordered keyed collection of commands, as declared in a command source.
///
/// Deserializes from either a mapping (`{"id": {...}}`, document order kept)
/// or an array of commands, which are keyed by their name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandSet {
    entries: Vec<(String, Command)>,
}

impl CommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, command: Command) -> Self {
        self.insert(key.to_string(), command);
        self
    }

    /// Re-inserting an existing key replaces its command in place.
    pub fn insert(&mut self, key: String, command: Command) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = command,
            None => self.entries.push((key, command)),
        }
    }

    pub fn extend(&mut self, other: CommandSet) {
        for (key, command) in other.entries {
            self.insert(key, command);
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

    pub fn into_entries(self) -> Vec<(String, Command)> {
        self.entries
    }
}

impl FromIterator<(String, Command)> for CommandSet {
    fn from_iter<T: IntoIterator<Item = (String, Command)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (key, command) in iter {
            set.insert(key, command);
        }
        set
    }
}

impl Serialize for CommandSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(key, command)| (key, command)))
    }
}

impl<'de> Deserialize<'de> for CommandSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CommandSetVisitor)
    }
}

struct CommandSetVisitor;

impl<'de> Visitor<'de> for CommandSetVisitor {
    type Value = CommandSet;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a map of command ids to commands, or an array of commands")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut set = CommandSet::new();
        while let Some((key, record)) = map.next_entry::<String, CommandRecord>()? {
            set.insert(key, record.into());
        }
        Ok(set)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut set = CommandSet::new();
        while let Some(record) = seq.next_element::<CommandRecord>()? {
            let command: Command = record.into();
            set.insert(command.name.clone(), command);
        }
        Ok(set)
    }
}
