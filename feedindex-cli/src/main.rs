//! FeedIndex CLI - Command-line interface
//!
//! Inspect and edit the package index of a static package feed.

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::index::{IndexCommands, Outcome};
use error::CliError;
use feedindex::IndexConfig;
use output::ConsoleOutput;

#[derive(Debug, Parser)]
#[command(name = "feedindex", version, about = "Inspect and edit a package feed index")]
struct Cli {
    /// Path to the index document (overrides the config file)
    #[arg(long, global = true, value_name = "PATH")]
    index: Option<PathBuf>,

    /// Config file (defaults to ~/.config/feedindex/config.ini if present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keep the index file when it lists no packages
    #[arg(long, global = true, value_name = "BOOL")]
    persist_empty: Option<bool>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: IndexCommands,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "feedindex=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve configuration: explicit config file, then the default file, then
/// built-in defaults. CLI flags take precedence over all of them.
fn resolve_config(cli: &Cli) -> Result<IndexConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => IndexConfig::from_ini_file(path)?,
        None => match IndexConfig::default_path().filter(|p| p.exists()) {
            Some(path) => {
                debug!(path = %path.display(), "Using default config file");
                IndexConfig::from_ini_file(&path)?
            }
            None => IndexConfig::default(),
        },
    };

    if let Some(path) = &cli.index {
        config = config.with_index_path(path);
    }
    if let Some(persist) = cli.persist_empty {
        config = config.with_persist_when_empty(persist);
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<Outcome, CliError> {
    let config = resolve_config(&cli)?;
    debug!(index = %config.index_path.display(), "Resolved configuration");

    let cancellation = CancellationToken::new();
    let handler_token = cancellation.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .map_err(|e| CliError::Runtime(format!("failed to install Ctrl-C handler: {}", e)))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(format!("failed to create Tokio runtime: {}", e)))?;

    let doc = config.open(cancellation);
    let output = ConsoleOutput::new();
    runtime.block_on(commands::index::run(cli.command, &doc, &output))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::NotFound) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
