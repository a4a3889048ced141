//! The package index document.
//!
//! This module provides the persisted manifest of every package and symbols
//! package a feed contains, along with the JSON codec that defines its layout.
//!
//! # Overview
//!
//! ```text
//! caller ──► IndexDocument ──► IndexStore::exists / fetch_json_or_template
//!                 │                      │
//!                 │               codec::from_json ──► PackageSets
//!                 │                                        │ mutate
//!                 │               codec::to_json  ◄────────┘
//!                 └──► PersistObserver ──► IndexStore::save(json, is_empty)
//! ```
//!
//! Every call reloads the document, so each operation observes the latest
//! persisted state.

pub mod codec;
mod document;
mod error;
mod observer;
mod operations;

pub use document::IndexDocument;
pub use error::{IndexError, IndexResult};
pub use observer::{PersistEvent, PersistMetrics, PersistObserver, PersistSnapshot, TracingObserver};
pub use operations::{apply_add_remove, AddRemovePackages, IndexOperations};
