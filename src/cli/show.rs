//! Read-only commands: `show` and `get`.

use super::{Cli, open_store, parse_value};
use crate::codec::{self, FileFormat};
use crate::store::PathOptions;
use anyhow::{Result, anyhow, bail};
use clap::{Args, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;

/// Output format for `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl From<OutputFormat> for FileFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Yaml => FileFormat::Yaml,
            OutputFormat::Json => FileFormat::Json,
        }
    }
}

/// Arguments for the show command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Configuration file to load
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

/// Arguments for the get command.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration file to load
    pub file: PathBuf,

    /// Path of the value, e.g. `server.port`
    pub path: String,

    /// Value printed when the path does not exist
    #[arg(short, long)]
    pub default: Option<String>,
}

/// Run the show command.
pub fn run_show(cli: &Cli, args: &ShowArgs) -> Result<()> {
    let store = open_store(cli, &args.file)?;
    let rendered = codec::render(store.data(), args.format.into(), true).map_err(|e| anyhow!(e))?;
    print!("{}", rendered);
    Ok(())
}

/// Run the get command.
pub fn run_get(cli: &Cli, args: &GetArgs) -> Result<()> {
    let store = open_store(cli, &args.file)?;
    let value = match store.get_with(&args.path, &PathOptions::separator(&cli.separator)) {
        Some(value) => value.clone(),
        None => match &args.default {
            Some(default) => parse_value(default),
            None => bail!("'{}' not found in {}", args.path, args.file.display()),
        },
    };
    println!("{}", format_value(&value)?);
    Ok(())
}

/// Strings print bare; everything else prints as JSON.
fn format_value(value: &Value) -> Result<String> {
    Ok(match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("plain")).unwrap(), "plain");
        assert_eq!(format_value(&json!(8080)).unwrap(), "8080");
        assert_eq!(format_value(&json!({"a": 1})).unwrap(), "{\n  \"a\": 1\n}");
    }
}
