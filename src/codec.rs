//! File contents codec.
//!
//! Translates between files on disk and [`ConfigTree`]s. The format is picked
//! from the file extension (`.yml`, `.yaml`, `.json`) unless a `format` option
//! overrides it.
//!
//! Recognised options (all optional):
//! - `format`: `"yaml"` or `"json"`
//! - `pretty`: pretty-print JSON output (default `true`)
//! - `createDirs`: create missing parent directories before writing

use crate::error::{ConfigError, Result};
use crate::tree::ConfigTree;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Supported on-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Yaml => write!(f, "yaml"),
            FileFormat::Json => write!(f, "json"),
        }
    }
}

impl FileFormat {
    /// Parse a format name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(FileFormat::Yaml),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }

    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_name)
    }

    /// Resolve the format for `path`, honouring a `format` option.
    pub fn resolve(path: &Path, options: &ConfigTree) -> Result<Self> {
        match options.get("format") {
            None | Some(Value::Null) => Self::from_path(path).ok_or_else(|| {
                ConfigError::invalid_argument(format!(
                    "Cannot detect the format of \"{}\". Supported extensions: yml, yaml, json.",
                    path.display()
                ))
            }),
            Some(Value::String(name)) => Self::from_name(name).ok_or_else(|| {
                ConfigError::invalid_argument(format!(
                    "Invalid format \"{name}\". Valid formats: yaml, json."
                ))
            }),
            Some(_) => Err(ConfigError::invalid_option_type("format", &["string"])),
        }
    }
}

fn flag(options: &ConfigTree, name: &str, default: bool) -> bool {
    options.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Parse file contents into a tree. An empty document is an empty tree.
pub fn parse(content: &str, format: FileFormat) -> std::result::Result<ConfigTree, String> {
    let value: Value = match format {
        FileFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string())?,
        FileFormat::Json if content.trim().is_empty() => Value::Null,
        FileFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string())?,
    };

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(ConfigTree::new()),
        other => Err(format!(
            "top-level value must be a mapping, found {}",
            kind_of(&other)
        )),
    }
}

/// Serialize a tree into file contents.
pub fn render(tree: &ConfigTree, format: FileFormat, pretty: bool) -> std::result::Result<String, String> {
    match format {
        FileFormat::Yaml => serde_yaml::to_string(tree).map_err(|e| e.to_string()),
        FileFormat::Json if pretty => serde_json::to_string_pretty(tree)
            .map(|s| s + "\n")
            .map_err(|e| e.to_string()),
        FileFormat::Json => serde_json::to_string(tree).map_err(|e| e.to_string()),
    }
}

/// Read and parse the file at `path`.
pub fn read_file(path: &Path, options: &ConfigTree) -> Result<ConfigTree> {
    let format = FileFormat::resolve(path, options)?;
    debug!(path = %path.display(), %format, "reading configuration file");

    let content = std::fs::read_to_string(path)?;
    parse(&content, format).map_err(|message| ConfigError::Codec {
        action: "parse",
        path: path.to_path_buf(),
        message,
    })
}

/// Serialize `tree` and write it to `path`.
pub fn write_file(path: &Path, tree: &ConfigTree, options: &ConfigTree) -> Result<()> {
    let format = FileFormat::resolve(path, options)?;
    let content =
        render(tree, format, flag(options, "pretty", true)).map_err(|message| ConfigError::Codec {
            action: "serialize",
            path: path.to_path_buf(),
            message,
        })?;

    if flag(options, "createDirs", false) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
    }

    debug!(path = %path.display(), %format, bytes = content.len(), "writing configuration file");
    std::fs::write(path, content)?;
    Ok(())
}

/// Human-readable name of a value's type, for error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path(Path::new("a/config.yml")), Some(FileFormat::Yaml));
        assert_eq!(FileFormat::from_path(Path::new("config.YAML")), Some(FileFormat::Yaml));
        assert_eq!(FileFormat::from_path(Path::new("config.json")), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_path(Path::new("config.ini")), None);
        assert_eq!(FileFormat::from_path(Path::new("config")), None);
    }

    #[test]
    fn test_format_option_overrides_extension() {
        let options = json!({"format": "json"}).as_object().cloned().unwrap();
        assert_eq!(
            FileFormat::resolve(Path::new("settings.conf"), &options).unwrap(),
            FileFormat::Json
        );
    }

    #[test]
    fn test_parse_yaml_and_empty_document() {
        let tree = parse("server:\n  port: 8080\n", FileFormat::Yaml).unwrap();
        assert_eq!(Value::Object(tree), json!({"server": {"port": 8080}}));
        assert!(parse("", FileFormat::Yaml).unwrap().is_empty());
        assert!(parse("  \n", FileFormat::Json).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_non_mapping_root() {
        let err = parse("- a\n- b\n", FileFormat::Yaml).unwrap_err();
        assert!(err.contains("sequence"));
    }

    #[test]
    fn test_write_then_read_json_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/out.json");
        let tree = json!({"b": 1, "a": [true, null]}).as_object().cloned().unwrap();
        let options = json!({"createDirs": true}).as_object().cloned().unwrap();

        write_file(&path, &tree, &options).unwrap();
        let read = read_file(&path, &ConfigTree::new()).unwrap();
        assert_eq!(read, tree);
    }

    #[test]
    fn test_read_reports_parse_errors_with_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = read_file(&path, &ConfigTree::new()).unwrap_err();
        assert!(matches!(err, ConfigError::Codec { action: "parse", .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
