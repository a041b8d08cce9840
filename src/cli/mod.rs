//! `config-store` subcommands: `show` prints a loaded file, `get` prints one
//! value by path, `set` and `merge` edit a file and save it back (or to
//! `--output`).
//!
//! Global flags shape the [`StoreOptions`] every subcommand opens its file
//! with: `--separator`, `--var KEY=VALUE` template variables and `--imports`.

pub mod edit;
pub mod show;

use crate::{ConfigStore, ConfigTree, LoadOptions, StoreOptions};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use edit::{MergeArgs, SetArgs};
use serde_json::Value;
use show::{GetArgs, ShowArgs};
use std::path::Path;

/// Inspect and edit YAML/JSON configuration files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Separator between keys in configuration paths
    #[arg(short, long, default_value = ".", global = true)]
    pub separator: String,

    /// Template variable as PLACEHOLDER=VALUE (repeatable)
    #[arg(long = "var", value_name = "PLACEHOLDER=VALUE", global = true)]
    pub vars: Vec<String>,

    /// Follow `import` directives in loaded files
    #[arg(short, long, global = true)]
    pub imports: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the fully loaded configuration
    Show(ShowArgs),

    /// Print the value at a path
    Get(GetArgs),

    /// Set the value at a path and save the file
    Set(SetArgs),

    /// Merge another file into the configuration and save the result
    Merge(MergeArgs),
}

/// Run the selected subcommand.
pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Show(args) => show::run_show(cli, args),
        Command::Get(args) => show::run_get(cli, args),
        Command::Set(args) => edit::run_set(cli, args),
        Command::Merge(args) => edit::run_merge(cli, args),
    }
}

/// Split a `PLACEHOLDER=VALUE` argument.
pub fn parse_var(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((placeholder, _)) if placeholder.is_empty() => {
            bail!("template variable '{}' has an empty placeholder", raw)
        }
        Some((placeholder, value)) => Ok((placeholder.to_string(), value.to_string())),
        None => bail!("template variable '{}' must look like PLACEHOLDER=VALUE", raw),
    }
}

/// Parse a command-line value as YAML, falling back to a plain string.
///
/// `8080` becomes a number, `[a, b]` a sequence, `hello world` a string.
pub fn parse_value(raw: &str) -> Value {
    match serde_yaml::from_str::<Value>(raw) {
        Ok(Value::Null) if !raw.trim().is_empty() && raw.trim() != "null" && raw.trim() != "~" => {
            Value::String(raw.to_string())
        }
        Ok(value) => value,
        Err(_) => Value::String(raw.to_string()),
    }
}

/// Build store options from the global flags.
pub fn store_options(cli: &Cli) -> Result<StoreOptions> {
    let mut options = StoreOptions::new().with_separator(cli.separator.clone());
    for raw in &cli.vars {
        let (placeholder, value) = parse_var(raw)?;
        options = options.with_template_variable(placeholder, value);
    }
    Ok(options)
}

/// Load `file` into a fresh file-backed store.
pub fn open_store(cli: &Cli, file: &Path) -> Result<ConfigStore> {
    let mut store = ConfigStore::new(ConfigTree::new(), store_options(cli)?)?;
    store
        .load(
            LoadOptions::new()
                .with_file(file)
                .process_imports(cli.imports),
        )
        .with_context(|| format!("Failed to load {}", file.display()))?;
    Ok(store)
}
