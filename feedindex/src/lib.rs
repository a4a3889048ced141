//! FeedIndex - package index for static package feeds
//!
//! This library maintains the persisted manifest of package identities
//! (package id + version) published to a static feed, with a parallel index
//! of symbols packages. A publishing pipeline adds and removes packages
//! through [`IndexDocument`] and queries it for what the feed contains.
//!
//! # Modules
//!
//! - [`version`] - package version parsing and ordering
//! - [`package`] - identities and case-insensitive identity sets
//! - [`index`] - the index document, its JSON codec and persist hooks
//! - [`store`] - storage backends for the persisted document
//! - [`config`] - settings for opening an index

pub mod config;
pub mod index;
pub mod package;
pub mod store;
pub mod version;

pub use config::{ConfigError, IndexConfig};
pub use index::{IndexDocument, IndexError, IndexOperations, IndexResult};
pub use package::{PackageCategory, PackageIdentity, PackageSet, PackageSets};
pub use store::{FileIndexStore, IndexStore, MemoryIndexStore};
pub use version::{PackageVersion, VersionError};
