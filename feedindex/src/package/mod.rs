//! Package identity types for the feed index.
//!
//! # Overview
//!
//! - **PackageIdentity**: package id plus version, id compared case-insensitively
//! - **PackageSet**: unique collection of identities for one category
//! - **PackageSets**: the packages set and the symbols set of one index document
//!
//! # Type Hierarchy
//!
//! ```text
//! PackageSets
//! ├── packages: PackageSet ──► { PackageIdentity { id, version }, ... }
//! └── symbols:  PackageSet ──► { PackageIdentity { id, version }, ... }
//! ```

mod identity;
mod set;
mod sets;

pub use identity::PackageIdentity;
pub use set::PackageSet;
pub use sets::{PackageCategory, PackageSets};
