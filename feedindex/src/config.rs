//! Configuration for opening a package index.
//!
//! Configuration can be built in code or read from an INI file:
//!
//! ```ini
//! [index]
//! path = /srv/feed/packageindex.json
//! persist_when_empty = false
//! ```
//!
//! The default file lives at `~/.config/feedindex/config.ini`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ini::Ini;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::index::{IndexDocument, TracingObserver};
use crate::store::FileIndexStore;

/// Default index filename within a feed.
pub const INDEX_FILENAME: &str = "packageindex.json";

/// Config file section holding index settings.
const INDEX_SECTION: &str = "index";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or parsed.
    #[error("failed to load config {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// A setting has an unusable value.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Settings for opening an index document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Path of the index document.
    pub index_path: PathBuf,

    /// Whether an index with no packages is written or its file removed.
    pub persist_when_empty: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from(INDEX_FILENAME),
            persist_when_empty: true,
        }
    }
}

impl IndexConfig {
    /// Create a configuration for the given index path.
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            ..Default::default()
        }
    }

    /// Set the index path.
    pub fn with_index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.index_path = path.into();
        self
    }

    /// Set whether empty indexes are persisted.
    pub fn with_persist_when_empty(mut self, persist: bool) -> Self {
        self.persist_when_empty = persist;
        self
    }

    /// Default config file location, if a user config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("feedindex").join("config.ini"))
    }

    /// Load settings from an INI file, starting from defaults.
    ///
    /// A relative `path` is resolved against the config file's directory.
    pub fn from_ini_file(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config = Self::from_ini(&ini)?;
        if config.index_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.index_path = dir.join(&config.index_path);
            }
        }
        Ok(config)
    }

    /// Read settings from a parsed INI document.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let Some(section) = ini.section(Some(INDEX_SECTION)) else {
            return Ok(config);
        };

        if let Some(path) = section.get("path") {
            if path.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "index.path".to_string(),
                    value: path.to_string(),
                    reason: "path must not be empty".to_string(),
                });
            }
            config.index_path = PathBuf::from(path.trim());
        }

        if let Some(value) = section.get("persist_when_empty") {
            config.persist_when_empty =
                parse_bool(value).ok_or_else(|| ConfigError::InvalidValue {
                    key: "index.persist_when_empty".to_string(),
                    value: value.to_string(),
                    reason: "expected true or false".to_string(),
                })?;
        }

        Ok(config)
    }

    /// Build the file store described by this configuration.
    pub fn store(&self) -> FileIndexStore {
        FileIndexStore::new(&self.index_path).with_persist_when_empty(self.persist_when_empty)
    }

    /// Open the index document with tracing instrumentation.
    pub fn open(&self, cancellation: CancellationToken) -> IndexDocument {
        IndexDocument::new(Arc::new(self.store()))
            .with_observer(Arc::new(TracingObserver))
            .with_cancellation(cancellation)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
