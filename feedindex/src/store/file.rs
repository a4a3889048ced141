//! Local file store for index documents.
//!
//! Documents are written pretty-printed to a sibling temporary file and
//! renamed into place, so a failed write leaves the previous document intact.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use super::traits::{BoxFuture, IndexStore};
use crate::index::{IndexError, IndexResult};

/// Suffix appended to the document filename while a write is in progress.
const TEMP_SUFFIX: &str = ".tmp";

/// Index document stored as a JSON file on local disk.
#[derive(Debug, Clone)]
pub struct FileIndexStore {
    path: PathBuf,
    persist_when_empty: bool,
}

impl FileIndexStore {
    /// Create a store for the given file path.
    ///
    /// Empty documents are persisted by default.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            persist_when_empty: true,
        }
    }

    /// Choose whether empty documents are written or the file is removed.
    pub fn with_persist_when_empty(mut self, persist: bool) -> Self {
        self.persist_when_empty = persist;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(TEMP_SUFFIX);
        self.path.with_file_name(name)
    }

    fn read_error(&self, source: io::Error) -> IndexError {
        IndexError::ReadFailed {
            location: self.location(),
            source,
        }
    }

    fn write_error(&self, source: io::Error) -> IndexError {
        IndexError::WriteFailed {
            location: self.location(),
            source,
        }
    }

    async fn write_document(&self, json: &Value) -> IndexResult<()> {
        let mut bytes = serde_json::to_vec_pretty(json).map_err(|e| self.write_error(e.into()))?;
        bytes.push(b'\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_error(e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes)
            .await
            .map_err(|e| self.write_error(e))?;

        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(self.write_error(e));
        }

        debug!(path = %self.path.display(), bytes = bytes.len(), "Wrote index document");
        Ok(())
    }

    async fn remove_document(&self) -> IndexResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Removed empty index document");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.write_error(e)),
        }
    }
}

impl IndexStore for FileIndexStore {
    fn exists(&self) -> BoxFuture<'_, IndexResult<bool>> {
        Box::pin(async move {
            tokio::fs::try_exists(&self.path)
                .await
                .map_err(|e| self.read_error(e))
        })
    }

    fn fetch_json_or_template(&self, template: Value) -> BoxFuture<'_, IndexResult<Value>> {
        Box::pin(async move {
            let content = match tokio::fs::read_to_string(&self.path).await {
                Ok(content) => content,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(template),
                Err(e) => return Err(self.read_error(e)),
            };

            serde_json::from_str(&content).map_err(|source| IndexError::Json {
                location: self.location(),
                source,
            })
        })
    }

    fn save(&self, json: Value, is_empty: bool) -> BoxFuture<'_, IndexResult<()>> {
        Box::pin(async move {
            if is_empty && !self.persist_when_empty {
                self.remove_document().await
            } else {
                self.write_document(&json).await
            }
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let store = FileIndexStore::new(temp.path().join("index.json"));

        assert!(!store.exists().await.unwrap());
        let json = store
            .fetch_json_or_template(json!({ "packages": {} }))
            .await
            .unwrap();
        assert_eq!(json, json!({ "packages": {} }));
    }

    #[tokio::test]
    async fn test_save_and_fetch() {
        let temp = TempDir::new().unwrap();
        let store = FileIndexStore::new(temp.path().join("index.json"));

        let doc = json!({ "packages": { "A": ["1.0.0"] }, "symbols": {} });
        store.save(doc.clone(), false).await.unwrap();

        assert!(store.exists().await.unwrap());
        assert_eq!(store.fetch_json_or_template(json!({})).await.unwrap(), doc);
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_save_pretty_with_trailing_newline() {
        let temp = TempDir::new().unwrap();
        let store = FileIndexStore::new(temp.path().join("index.json"));

        store
            .save(json!({ "packages": {}, "symbols": {} }), true)
            .await
            .unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "{\n  \"packages\": {},\n  \"symbols\": {}\n}\n");
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let store = FileIndexStore::new(temp.path().join("feed").join("index.json"));

        store.save(json!({ "packages": {} }), false).await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_empty_document_removed_when_not_persisted() {
        let temp = TempDir::new().unwrap();
        let store =
            FileIndexStore::new(temp.path().join("index.json")).with_persist_when_empty(false);

        store
            .save(json!({ "packages": { "A": ["1.0.0"] } }), false)
            .await
            .unwrap();
        assert!(store.exists().await.unwrap());

        store.save(json!({ "packages": {} }), true).await.unwrap();
        assert!(!store.exists().await.unwrap());

        // Removing an already absent document is fine
        store.save(json!({ "packages": {} }), true).await.unwrap();
        assert!(!store.exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileIndexStore::new(&path);
        let err = store.fetch_json_or_template(json!({})).await.unwrap_err();
        assert!(matches!(err, IndexError::Json { .. }));
    }

    #[test]
    fn test_temp_path() {
        let store = FileIndexStore::new("/feed/index.json");
        assert_eq!(store.temp_path(), PathBuf::from("/feed/index.json.tmp"));
        assert_eq!(store.location(), "/feed/index.json");
    }
}
