//! Index commands for inspecting and editing a feed's package index.
//!
//! - `args`: CLI argument types (clap-derived)
//! - `handlers`: command handlers, written against [`Output`] and
//!   [`IndexDocument`] so they can be tested with in-memory stores

mod args;
mod handlers;

pub use args::IndexCommands;

use feedindex::IndexDocument;

use crate::error::CliError;
use crate::output::Output;

/// Result of a command that completed without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The queried package is not in the index.
    NotFound,
}

/// Run an index subcommand against an opened document.
pub async fn run(
    command: IndexCommands,
    doc: &IndexDocument,
    out: &dyn Output,
) -> Result<Outcome, CliError> {
    match command {
        IndexCommands::Init => handlers::init(doc, out).await,
        IndexCommands::List { symbols } => handlers::list(doc, symbols.into(), out).await,
        IndexCommands::Versions { id, symbols } => {
            handlers::versions(doc, &id, symbols.into(), out).await
        }
        IndexCommands::Exists {
            id,
            version,
            symbols,
        } => handlers::exists(doc, &id, &version, symbols.into(), out).await,
        IndexCommands::Add {
            id,
            versions,
            symbols,
        } => handlers::add(doc, &id, &versions, symbols.into(), out).await,
        IndexCommands::Remove {
            id,
            versions,
            symbols,
        } => handlers::remove(doc, &id, &versions, symbols.into(), out).await,
    }
}
