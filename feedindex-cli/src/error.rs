//! CLI error types.

use std::fmt;

use feedindex::{ConfigError, IndexError, VersionError};

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be resolved.
    Config(String),

    /// A version argument failed to parse.
    InvalidVersion { value: String, source: VersionError },

    /// An index operation failed.
    Index(IndexError),

    /// Failed to set up the async runtime or signal handling.
    Runtime(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidVersion { value, source } => {
                write!(f, "Invalid version '{}': {}", value, source)
            }
            CliError::Index(e) => write!(f, "{}", e),
            CliError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::InvalidVersion { source, .. } => Some(source),
            CliError::Index(e) => Some(e),
            CliError::Config(_) | CliError::Runtime(_) => None,
        }
    }
}

impl From<IndexError> for CliError {
    fn from(e: IndexError) -> Self {
        CliError::Index(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}
