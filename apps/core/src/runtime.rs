use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{self, Config, ConfigError};
use crate::dispatch::DispatchTarget;
use crate::error::EngineError;
use crate::loader::{CommandSource, LoadStatus};
use crate::logging;
use crate::options::Options;
use crate::palette::CommandPalette;
use crate::transport::handle_json;

#[derive(Debug)]
pub enum RuntimeError {
    Config(ConfigError),
    Engine(EngineError),
    Io(std::io::Error),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(error) => write!(f, "config error: {error}"),
            Self::Engine(error) => write!(f, "engine error: {error}"),
            Self::Io(error) => write!(f, "io error: {error}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<ConfigError> for RuntimeError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<EngineError> for RuntimeError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub commands_path: Option<PathBuf>,
    pub options_path: Option<PathBuf>,
    pub queries: Vec<String>,
    pub executes: Vec<String>,
    pub serve: bool,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("missing value for {flag}"))
        };
        match arg.as_str() {
            "--config" => options.config_path = Some(PathBuf::from(value("--config")?)),
            "--commands" => options.commands_path = Some(PathBuf::from(value("--commands")?)),
            "--options" => options.options_path = Some(PathBuf::from(value("--options")?)),
            "--query" => options.queries.push(value("--query")?),
            "--execute" => options.executes.push(value("--execute")?),
            "--serve" => options.serve = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    if options.commands_path.is_none() && options.config_path.is_none() {
        return Err("either --commands or --config is required".to_string());
    }
    if !options.serve && options.queries.is_empty() && options.executes.is_empty() {
        return Err("nothing to do: pass --query, --execute or --serve".to_string());
    }
    Ok(options)
}

/// Stands in for the host's function namespace: every named callback
/// resolves and is reported on stdout.
struct EchoTarget;

impl DispatchTarget for EchoTarget {
    fn invoke(&self, callback: &str, identifier: &str) -> bool {
        println!("[palette-core] dispatched {callback}({identifier})");
        true
    }

    fn provides(&self, _callback: &str) -> bool {
        true
    }
}

pub fn run_with_options(cli: CliOptions) -> Result<(), RuntimeError> {
    let mut cfg = match &cli.config_path {
        Some(path) => config::load(path)?,
        None => Config::default(),
    };
    if let Some(commands) = &cli.commands_path {
        cfg.commands = Some(commands.clone());
    }
    if let Some(path) = &cli.options_path {
        cfg.options = load_options(path)?;
    }
    config::validate(&cfg).map_err(ConfigError::Invalid)?;

    if let Err(error) = logging::init(&cfg.log_dir) {
        eprintln!("[palette-core] logging disabled: {error}");
    }

    let commands = cfg
        .commands
        .clone()
        .ok_or_else(|| ConfigError::Invalid("no command source configured".to_string()))?;
    let mut palette = CommandPalette::new(CommandSource::from_path(commands), cfg.options.clone())
        .with_dispatch_target(Arc::new(EchoTarget));
    if let LoadStatus::Failed(error) = palette.status() {
        return Err(RuntimeError::Engine(EngineError::Load(error.clone())));
    }
    logging::info(&format!(
        "startup commands={} sort={:?}",
        palette.registry().len(),
        palette.options().sort
    ));

    let max_results = cfg.max_results as usize;
    for query in &cli.queries {
        for line in palette.listen(query).into_iter().take(max_results) {
            println!("{line}");
        }
    }
    for identifier in &cli.executes {
        palette.execute(identifier)?;
    }

    if cli.serve {
        serve(&mut palette)?;
    }
    Ok(())
}

/// One JSON request per stdin line, one JSON response per stdout line.
fn serve(palette: &mut CommandPalette) -> Result<(), RuntimeError> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_json(palette, &line, Some(&EchoTarget));
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn load_options(path: &Path) -> Result<Options, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .and_then(|v| v.to_str())
        .is_some_and(|v| v.eq_ignore_ascii_case("toml"));
    if is_toml {
        toml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))
    } else {
        json5::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
