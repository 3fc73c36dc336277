use serde::{Deserialize, Serialize};

use crate::contract::{CoreRequest, CoreResponse};
use crate::dispatch::DispatchTarget;
use crate::error::EngineError;
use crate::palette::CommandPalette;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    NotFound,
    Configuration,
    Validation,
    Load,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok { response: CoreResponse },
    Err { error: ErrorResponse },
}

pub fn handle_request(
    palette: &mut CommandPalette,
    request: CoreRequest,
    target: Option<&dyn DispatchTarget>,
) -> TransportResponse {
    match palette.handle_command(request, target) {
        Ok(response) => TransportResponse::Ok { response },
        Err(error) => TransportResponse::Err {
            error: map_engine_error(error),
        },
    }
}

pub fn handle_json(
    palette: &mut CommandPalette,
    payload: &str,
    target: Option<&dyn DispatchTarget>,
) -> String {
    let response = match serde_json::from_str::<CoreRequest>(payload) {
        Ok(request) => handle_request(palette, request, target),
        Err(error) => TransportResponse::Err {
            error: ErrorResponse {
                code: classify_decode_error(&error),
                message: error.to_string(),
            },
        },
    };

    serde_json::to_string(&response).expect("transport response should serialize")
}

/// Bad sort values surface through serde; keep them tagged as configuration
/// errors instead of generic JSON failures.
fn classify_decode_error(error: &serde_json::Error) -> ErrorCode {
    if error.is_data() && error.to_string().contains("configuration error") {
        ErrorCode::Configuration
    } else {
        ErrorCode::InvalidJson
    }
}

fn map_engine_error(error: EngineError) -> ErrorResponse {
    let code = match &error {
        EngineError::Load(_) => ErrorCode::Load,
        EngineError::NotFound(_) => ErrorCode::NotFound,
        EngineError::Configuration(_) => ErrorCode::Configuration,
        EngineError::Validation(_) => ErrorCode::Validation,
    };
    ErrorResponse {
        code,
        message: error.to_string(),
    }
}
