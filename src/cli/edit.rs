//! Commands that change a configuration file: `set` and `merge`.

use super::{Cli, open_store, parse_value};
use crate::store::{LoadOptions, PathOptions, SaveOptions};
use crate::tree::MergeStrategy;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the set command.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration file to edit
    pub file: PathBuf,

    /// Path of the value, e.g. `server.port`
    pub path: String,

    /// New value, parsed as YAML (`8080`, `true`, `[a, b]`) or kept as text
    pub value: String,

    /// Write the result here instead of back to FILE
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the merge command.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Configuration file to merge into
    pub file: PathBuf,

    /// File whose contents are merged in
    pub other: PathBuf,

    /// merge, mergeRecursive, replace or replaceRecursive
    #[arg(long, default_value = "replaceRecursive")]
    pub strategy: MergeStrategy,

    /// Merge under this path instead of the root
    #[arg(short, long)]
    pub key: Option<String>,

    /// Write the result here instead of back to FILE
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the set command.
pub fn run_set(cli: &Cli, args: &SetArgs) -> Result<()> {
    let mut store = open_store(cli, &args.file)?;
    store.set_with(
        &args.path,
        parse_value(&args.value),
        &PathOptions::separator(&cli.separator),
    )?;

    let target = args.output.as_ref().unwrap_or(&args.file);
    store
        .save(SaveOptions::new().with_file(target))
        .with_context(|| format!("Failed to save {}", target.display()))?;
    info!(path = %args.path, file = %target.display(), "value set");
    Ok(())
}

/// Run the merge command.
pub fn run_merge(cli: &Cli, args: &MergeArgs) -> Result<()> {
    let mut store = open_store(cli, &args.file)?;

    let mut load = LoadOptions::new()
        .with_file(&args.other)
        .process_imports(cli.imports)
        .with_strategy(args.strategy);
    if let Some(key) = &args.key {
        load = load.load_in_key(key.clone());
    }
    store
        .load(load)
        .with_context(|| format!("Failed to merge {}", args.other.display()))?;

    let target = args.output.as_ref().unwrap_or(&args.file);
    store
        .save(SaveOptions::new().with_file(target))
        .with_context(|| format!("Failed to save {}", target.display()))?;
    info!(
        from = %args.other.display(),
        file = %target.display(),
        strategy = %args.strategy,
        "merged"
    );
    Ok(())
}
