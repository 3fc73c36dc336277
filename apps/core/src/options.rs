use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStrategy {
    Alphabetical,
    ReverseAlphabetical,
    Rank,
    ReverseRank,
}

impl SortStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alphabetical => "alphabetical",
            Self::ReverseAlphabetical => "reverse-alphabetical",
            Self::Rank => "rank",
            Self::ReverseRank => "reverse-rank",
        }
    }
}

impl Display for SortStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortStrategy {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "alphabetical" => Ok(Self::Alphabetical),
            "reverse-alphabetical" => Ok(Self::ReverseAlphabetical),
            "rank" => Ok(Self::Rank),
            "reverse-rank" => Ok(Self::ReverseRank),
            other => Err(EngineError::Configuration(format!(
                "invalid sort strategy '{other}'"
            ))),
        }
    }
}

/// `sort` is written either as a strategy name or as `false`.
fn serialize_sort<S: Serializer>(
    sort: &Option<SortStrategy>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match sort {
        Some(strategy) => serializer.serialize_str(strategy.as_str()),
        None => serializer.serialize_bool(false),
    }
}

fn deserialize_sort<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SortStrategy>, D::Error> {
    deserializer.deserialize_any(SortVisitor)
}

struct SortVisitor;

impl<'de> Visitor<'de> for SortVisitor {
    type Value = Option<SortStrategy>;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("false or one of alphabetical, reverse-alphabetical, rank, reverse-rank")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        if value {
            return Err(E::custom("configuration error: sort must be false or a strategy name"));
        }
        Ok(None)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse::<SortStrategy>().map(Some).map_err(E::custom)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub case: bool,
    pub exact: bool,
    pub ranking: bool,
    #[serde(serialize_with = "serialize_sort", deserialize_with = "deserialize_sort")]
    pub sort: Option<SortStrategy>,
    pub dev: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            case: false,
            exact: false,
            ranking: false,
            sort: None,
            dev: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKey {
    Case,
    Exact,
    Ranking,
    Sort,
    Dev,
}

impl FromStr for OptionKey {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "case" => Ok(Self::Case),
            "exact" => Ok(Self::Exact),
            "ranking" => Ok(Self::Ranking),
            "sort" => Ok(Self::Sort),
            "dev" => Ok(Self::Dev),
            other => Err(EngineError::Configuration(format!("unknown option '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_sort_patch",
        deserialize_with = "deserialize_sort_patch"
    )]
    pub sort: Option<Option<SortStrategy>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev: Option<bool>,
}

fn serialize_sort_patch<S: Serializer>(
    sort: &Option<Option<SortStrategy>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match sort {
        Some(inner) => serialize_sort(inner, serializer),
        None => serializer.serialize_none(),
    }
}

fn deserialize_sort_patch<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Option<SortStrategy>>, D::Error> {
    deserialize_sort(deserializer).map(Some)
}

impl OptionsPatch {
    pub fn is_empty(&self) -> bool {
        self.case.is_none()
            && self.exact.is_none()
            && self.ranking.is_none()
            && self.sort.is_none()
            && self.dev.is_none()
    }
}

impl Options {
    pub fn update(&mut self, patch: OptionsPatch) -> Result<&Options, EngineError> {
        if patch.is_empty() {
            return Err(EngineError::Validation(
                "no options given to update".to_string(),
            ));
        }

        if let Some(case) = patch.case {
            self.case = case;
        }
        if let Some(exact) = patch.exact {
            self.exact = exact;
        }
        if let Some(ranking) = patch.ranking {
            self.ranking = ranking;
        }
        if let Some(sort) = patch.sort {
            self.sort = sort;
        }
        if let Some(dev) = patch.dev {
            self.dev = dev;
        }
        Ok(self)
    }

    /// Restores each named option to its default.
    pub fn reset(&mut self, keys: &[OptionKey]) -> Result<&Options, EngineError> {
        if keys.is_empty() {
            return Err(EngineError::Validation("no options given to reset".to_string()));
        }

        let defaults = Options::default();
        for key in keys {
            match key {
                OptionKey::Case => self.case = defaults.case,
                OptionKey::Exact => self.exact = defaults.exact,
                OptionKey::Ranking => self.ranking = defaults.ranking,
                OptionKey::Sort => self.sort = defaults.sort,
                OptionKey::Dev => self.dev = defaults.dev,
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{OptionKey, Options, OptionsPatch, SortStrategy};
    use crate::error::EngineError;

    #[test]
    fn parses_sort_false_and_strategy_names() {
        let off: Options = serde_json::from_str(r#"{"sort": false}"#).unwrap();
        assert_eq!(off.sort, None);

        let rank: Options = serde_json::from_str(r#"{"sort": "reverse-rank", "ranking": true}"#).unwrap();
        assert_eq!(rank.sort, Some(SortStrategy::ReverseRank));
        assert!(rank.ranking);
        assert!(!rank.case);
    }

    #[test]
    fn rejects_unknown_sort_strategy() {
        assert!(serde_json::from_str::<Options>(r#"{"sort": "random"}"#).is_err());
        assert!(serde_json::from_str::<Options>(r#"{"sort": true}"#).is_err());
        assert!(matches!(
            "shuffled".parse::<SortStrategy>(),
            Err(EngineError::Configuration(_))
        ));
    }

    #[test]
    fn update_requires_a_payload() {
        let mut options = Options::default();
        assert!(matches!(
            options.update(OptionsPatch::default()),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn reset_restores_defaults_for_named_keys() {
        let mut options = Options {
            case: true,
            exact: true,
            ..Default::default()
        };
        options.reset(&[OptionKey::Case]).unwrap();
        assert!(!options.case);
        assert!(options.exact);
        assert!(options.reset(&[]).is_err());
    }

    #[test]
    fn sort_round_trips_through_serialized_form() {
        let options = Options {
            sort: Some(SortStrategy::Alphabetical),
            ..Default::default()
        };
        let encoded = serde_json::to_string(&options).unwrap();
        assert!(encoded.contains(r#""sort":"alphabetical""#));
        let off = serde_json::to_string(&Options::default()).unwrap();
        assert!(off.contains(r#""sort":false"#));
    }
}
