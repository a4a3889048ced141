//! In-memory index store.
//!
//! Holds the document as a JSON value and counts saves. Useful for staging an
//! index before it is uploaded and for observing write behavior in tests.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde_json::Value;

use super::traits::{BoxFuture, IndexStore};
use crate::index::IndexResult;

/// Index document held in memory.
#[derive(Debug)]
pub struct MemoryIndexStore {
    document: Mutex<Option<Value>>,
    persist_when_empty: bool,
    saves: AtomicU64,
}

impl Default for MemoryIndexStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIndexStore {
    /// Create a store with no document.
    pub fn new() -> Self {
        Self {
            document: Mutex::new(None),
            persist_when_empty: true,
            saves: AtomicU64::new(0),
        }
    }

    /// Create a store seeded with an existing document.
    pub fn with_document(json: Value) -> Self {
        let store = Self::new();
        *store.document.lock() = Some(json);
        store
    }

    /// Choose whether empty documents are kept or dropped.
    pub fn with_persist_when_empty(mut self, persist: bool) -> Self {
        self.persist_when_empty = persist;
        self
    }

    /// Current document, if one is stored.
    pub fn document(&self) -> Option<Value> {
        self.document.lock().clone()
    }

    /// Number of times [`IndexStore::save`] has been called.
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::Relaxed)
    }
}

impl IndexStore for MemoryIndexStore {
    fn exists(&self) -> BoxFuture<'_, IndexResult<bool>> {
        Box::pin(async move { Ok(self.document.lock().is_some()) })
    }

    fn fetch_json_or_template(&self, template: Value) -> BoxFuture<'_, IndexResult<Value>> {
        Box::pin(async move { Ok(self.document.lock().clone().unwrap_or(template)) })
    }

    fn save(&self, json: Value, is_empty: bool) -> BoxFuture<'_, IndexResult<()>> {
        Box::pin(async move {
            self.saves.fetch_add(1, Ordering::Relaxed);
            let mut document = self.document.lock();
            *document = if is_empty && !self.persist_when_empty {
                None
            } else {
                Some(json)
            };
            Ok(())
        })
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
