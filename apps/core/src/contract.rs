use serde::{Deserialize, Serialize};

use crate::dispatch::DispatchTarget;
use crate::error::EngineError;
use crate::model::{CommandPatch, CommandSet};
use crate::options::{Options, OptionsPatch};
use crate::palette::CommandPalette;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListenRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListenResponse {
    pub results: Vec<String>,
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecuteRequest {
    pub identifier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecuteResponse {
    pub executed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyedCommand {
    pub key: String,
    #[serde(flatten)]
    pub patch: CommandPatch,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpsertRequest {
    pub commands: Vec<KeyedCommand>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentifiersRequest {
    pub identifiers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplaceRequest {
    pub commands: CommandSet,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountResponse {
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RanksResponse {
    pub ranks: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResetResponse {
    pub all_resolved: bool,
    pub resolved: Vec<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "payload")]
pub enum CoreRequest {
    Listen(ListenRequest),
    Execute(ExecuteRequest),
    Upsert(UpsertRequest),
    Remove(IdentifiersRequest),
    Replace(ReplaceRequest),
    RankingsGet(IdentifiersRequest),
    RankingsReset(IdentifiersRequest),
    RankingsClear,
    UpdateOptions(OptionsPatch),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload")]
pub enum CoreResponse {
    Listen(ListenResponse),
    Execute(ExecuteResponse),
    Upsert(CountResponse),
    Remove(CountResponse),
    Replace(CountResponse),
    RankingsGet(RanksResponse),
    RankingsReset(ResetResponse),
    RankingsClear,
    UpdateOptions(Options),
}

impl CommandPalette {
    /// Runs one contract request. Dispatch misses come back as
    /// `executed: false` rather than an error.
    pub fn handle_command(
        &mut self,
        request: CoreRequest,
        target: Option<&dyn DispatchTarget>,
    ) -> Result<CoreResponse, EngineError> {
        match request {
            CoreRequest::Listen(ListenRequest { query }) => {
                let results = self.listen(&query);
                Ok(CoreResponse::Listen(ListenResponse {
                    results,
                    changed: self.changed(),
                }))
            }
            CoreRequest::Execute(ExecuteRequest { identifier }) => {
                let result = match target {
                    Some(target) => self.execute_with(&identifier, target),
                    None => self.execute(&identifier),
                };
                match result {
                    Ok(()) => Ok(CoreResponse::Execute(ExecuteResponse { executed: true })),
                    Err(EngineError::NotFound(_)) => {
                        Ok(CoreResponse::Execute(ExecuteResponse { executed: false }))
                    }
                    Err(error) => Err(error),
                }
            }
            CoreRequest::Upsert(UpsertRequest { commands }) => {
                let count = commands.len();
                self.insert_or_update(
                    commands
                        .into_iter()
                        .map(|keyed| (keyed.key, keyed.patch))
                        .collect(),
                )?;
                Ok(CoreResponse::Upsert(CountResponse { count }))
            }
            CoreRequest::Remove(IdentifiersRequest { identifiers }) => {
                let count = self.remove(&identifiers)?;
                Ok(CoreResponse::Remove(CountResponse { count }))
            }
            CoreRequest::Replace(ReplaceRequest { commands }) => {
                let count = self.replace(commands)?;
                Ok(CoreResponse::Replace(CountResponse { count }))
            }
            CoreRequest::RankingsGet(IdentifiersRequest { identifiers }) => {
                let ranks = self.rankings().get(&identifiers)?;
                Ok(CoreResponse::RankingsGet(RanksResponse { ranks }))
            }
            CoreRequest::RankingsReset(IdentifiersRequest { identifiers }) => {
                let outcome = self.rankings().reset(&identifiers)?;
                Ok(CoreResponse::RankingsReset(ResetResponse {
                    all_resolved: outcome.all_resolved(),
                    resolved: outcome.results.iter().map(|(_, ok)| *ok).collect(),
                }))
            }
            CoreRequest::RankingsClear => {
                self.rankings().clear();
                Ok(CoreResponse::RankingsClear)
            }
            CoreRequest::UpdateOptions(patch) => {
                let options = self.update_options(patch)?.clone();
                Ok(CoreResponse::UpdateOptions(options))
            }
        }
    }
}
