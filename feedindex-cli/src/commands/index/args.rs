//! CLI argument types for index commands.

use clap::{Args, Subcommand};
use feedindex::PackageCategory;

/// Selects the symbols set instead of the packages set.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct CategoryArg {
    /// Operate on symbols packages instead of packages
    #[arg(long)]
    pub symbols: bool,
}

impl From<CategoryArg> for PackageCategory {
    fn from(arg: CategoryArg) -> Self {
        if arg.symbols {
            PackageCategory::Symbols
        } else {
            PackageCategory::Packages
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum IndexCommands {
    /// Write an empty index if none exists
    Init,

    /// List every package in the index
    List {
        #[command(flatten)]
        symbols: CategoryArg,
    },

    /// List the versions of one package, oldest first
    Versions {
        /// Package id (case-insensitive)
        id: String,

        #[command(flatten)]
        symbols: CategoryArg,
    },

    /// Check whether a package version is listed (exit code 1 if not)
    Exists {
        /// Package id (case-insensitive)
        id: String,

        /// Package version
        version: String,

        #[command(flatten)]
        symbols: CategoryArg,
    },

    /// Add package versions to the index
    Add {
        /// Package id
        id: String,

        /// One or more versions
        #[arg(required = true)]
        versions: Vec<String>,

        #[command(flatten)]
        symbols: CategoryArg,
    },

    /// Remove package versions from the index
    Remove {
        /// Package id (case-insensitive)
        id: String,

        /// One or more versions
        #[arg(required = true)]
        versions: Vec<String>,

        #[command(flatten)]
        symbols: CategoryArg,
    },
}
