use std::fmt::{Display, Formatter};

use crate::loader::LoadError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    Load(LoadError),
    NotFound(String),
    Configuration(String),
    Validation(String),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(error) => write!(f, "load error: {error}"),
            Self::NotFound(identifier) => write!(f, "command not found: {identifier}"),
            Self::Configuration(message) => write!(f, "configuration error: {message}"),
            Self::Validation(message) => write!(f, "validation error: {message}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<LoadError> for EngineError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}
