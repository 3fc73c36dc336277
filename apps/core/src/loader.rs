use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::model::CommandSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    Io { path: PathBuf, message: String },
    Parse { path: PathBuf, message: String },
    UnsupportedFormat(PathBuf),
    Empty,
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "read failed for '{}': {message}", path.display()),
            Self::Parse { path, message } => {
                write!(f, "invalid command source '{}': {message}", path.display())
            }
            Self::UnsupportedFormat(path) => {
                write!(f, "unsupported command source format: {}", path.display())
            }
            Self::Empty => write!(f, "command source contains no commands"),
        }
    }
}

impl std::error::Error for LoadError {}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandSource {
    Inline(CommandSet),
    File(PathBuf),
    Directory(PathBuf),
}

impl CommandSource {
    /// Picks `File` or `Directory` based on what exists at `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            Self::Directory(path)
        } else {
            Self::File(path)
        }
    }
}

impl From<CommandSet> for CommandSource {
    fn from(value: CommandSet) -> Self {
        Self::Inline(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Loaded(usize),
    Failed(LoadError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Json,
    Json5,
    Toml,
}

fn detect_format(path: &Path) -> Option<SourceFormat> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "json" => Some(SourceFormat::Json),
        "json5" => Some(SourceFormat::Json5),
        "toml" => Some(SourceFormat::Toml),
        _ => None,
    }
}

pub fn load(source: &CommandSource) -> Result<CommandSet, LoadError> {
    match source {
        CommandSource::Inline(set) => Ok(set.clone()),
        CommandSource::File(path) => load_file(path),
        CommandSource::Directory(path) => load_directory(path),
    }
}

pub fn load_file(path: &Path) -> Result<CommandSet, LoadError> {
    let format =
        detect_format(path).ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;
    let raw = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_str(&raw, format).map_err(|message| LoadError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

fn parse_str(raw: &str, format: SourceFormat) -> Result<CommandSet, String> {
    match format {
        SourceFormat::Json => serde_json::from_str(raw).map_err(|e| e.to_string()),
        SourceFormat::Json5 => json5::from_str(raw).map_err(|e| e.to_string()),
        SourceFormat::Toml => toml::from_str(raw).map_err(|e| e.to_string()),
    }
}

/// Loads every supported file under `dir`, in file-name order. Later files
/// override earlier ones that reuse a key.
pub fn load_directory(dir: &Path) -> Result<CommandSet, LoadError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| LoadError::Io {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() && detect_format(entry.path()).is_some() {
            files.push(entry.into_path());
        }
    }

    let mut set = CommandSet::new();
    for file in &files {
        set.extend(load_file(file)?);
    }
    if set.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{detect_format, parse_str, SourceFormat};

    #[test]
    fn detects_formats_case_insensitively() {
        assert_eq!(detect_format(Path::new("a/commands.JSON")), Some(SourceFormat::Json));
        assert_eq!(detect_format(Path::new("commands.json5")), Some(SourceFormat::Json5));
        assert_eq!(detect_format(Path::new("commands.toml")), Some(SourceFormat::Toml));
        assert_eq!(detect_format(Path::new("commands.yaml")), None);
        assert_eq!(detect_format(Path::new("commands")), None);
    }

    #[test]
    fn parses_json5_with_comments() {
        let raw = r#"{
            // primary entry
            open: { name: "Open File", aliases: ["Open"], callback: "openFile", },
        }"#;
        let set = parse_str(raw, SourceFormat::Json5).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn parses_toml_tables_in_order() {
        let raw = r#"
[save]
name = "Save File"
callback = "saveFile"

[open]
name = "Open File"
aliases = ["Open"]
rank = 2
"#;
        let set = parse_str(raw, SourceFormat::Toml).unwrap();
        let names: Vec<&str> = set.iter().map(|(_, c)| c.name.as_str()).collect();
        assert_eq!(names, vec!["Save File", "Open File"]);
    }
}
