//! Storage interface for persisted index documents.
//!
//! The index document never touches bytes directly. It asks an [`IndexStore`]
//! whether the document exists, fetches it as JSON, and hands back a JSON
//! value to save. How and where the bytes live is the store's concern.
//!
//! # Dyn Compatibility
//!
//! Async methods return [`BoxFuture`] so stores can be shared as
//! `Arc<dyn IndexStore>`.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::index::IndexResult;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Backing storage for one index document.
pub trait IndexStore: Send + Sync {
    /// Check whether the document has been persisted.
    fn exists(&self) -> BoxFuture<'_, IndexResult<bool>>;

    /// Fetch the document, or `template` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be read or is not
    /// valid JSON.
    fn fetch_json_or_template(&self, template: Value) -> BoxFuture<'_, IndexResult<Value>>;

    /// Persist the document.
    ///
    /// `is_empty` is true when the document lists no packages at all. Stores
    /// configured not to persist empty documents remove the physical document
    /// instead of writing it.
    fn save(&self, json: Value, is_empty: bool) -> BoxFuture<'_, IndexResult<()>>;

    /// Human-readable location for logs and errors.
    fn location(&self) -> String;
}
