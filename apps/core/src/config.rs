use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::logging;
use crate::options::Options;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::Parse(error) => write!(f, "parse error: {error}"),
            Self::Invalid(error) => write!(f, "invalid config: {error}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub commands: Option<PathBuf>,
    pub log_dir: PathBuf,
    pub max_results: u16,
    pub options: Options,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            commands: None,
            log_dir: logging::default_logs_dir(),
            max_results: 50,
            options: Options::default(),
        }
    }
}

/// Reads a TOML config file. Relative `commands` paths resolve against the
/// file's directory.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    let mut cfg = parse(&raw)?;
    if let (Some(commands), Some(parent)) = (cfg.commands.as_ref(), path.parent()) {
        if commands.is_relative() {
            cfg.commands = Some(parent.join(commands));
        }
    }
    validate(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

pub fn parse(raw: &str) -> Result<Config, ConfigError> {
    toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.max_results == 0 || cfg.max_results > 500 {
        return Err("max_results out of range".into());
    }

    if cfg.log_dir.as_os_str().is_empty() {
        return Err("log_dir is required".into());
    }

    if cfg
        .commands
        .as_ref()
        .is_some_and(|commands| commands.as_os_str().is_empty())
    {
        return Err("commands path is empty".into());
    }

    Ok(())
}
