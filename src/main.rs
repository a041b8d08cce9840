//! config-store CLI
//!
//! Loads YAML/JSON configuration files (optionally following their `import`
//! directives) and reads or edits values by dotted path.

use anyhow::Result;
use clap::Parser;
use config_store::cli::{self, Cli};
use std::fs::OpenOptions;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// `RUST_LOG` wins over `--verbose` when set.
fn env_filter(cli: &Cli) -> EnvFilter {
    let level = if cli.verbose { "debug" } else { "warn" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn init_logging(cli: &Cli) -> Result<()> {
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(cli))
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(cli))
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    debug!(command = ?cli.command, "starting");
    cli::run(&cli)
}
