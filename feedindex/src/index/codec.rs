//! JSON codec for the package index document.
//!
//! # Format
//!
//! ```text
//! {
//!   "packages": { "<PackageId>": ["<newest>", ..., "<oldest>"], ... },
//!   "symbols":  { "<PackageId>": ["<newest>", ..., "<oldest>"], ... }
//! }
//! ```
//!
//! Serialization is deterministic: ids are ordered case-insensitively and
//! versions newest first, so writing the same logical state always produces
//! the same document regardless of insertion order.
//!
//! `symbols` may be missing (or `null`) in documents written before symbols
//! support and reads as an empty set. `packages` is mandatory.

use serde_json::{Map, Value};
use tracing::debug;

use super::error::{IndexError, IndexResult};
use crate::package::{PackageCategory, PackageIdentity, PackageSet, PackageSets};
use crate::version::PackageVersion;

/// The document written when no index exists yet.
pub fn template() -> Value {
    let mut root = Map::new();
    for category in PackageCategory::ALL {
        root.insert(category.json_key().to_string(), Value::Object(Map::new()));
    }
    Value::Object(root)
}

/// Serialize both package sets into the index document layout.
pub fn to_json(sets: &PackageSets) -> Value {
    let mut root = Map::new();
    for category in PackageCategory::ALL {
        root.insert(
            category.json_key().to_string(),
            Value::Object(set_to_json(sets.get(category))),
        );
    }
    Value::Object(root)
}

fn set_to_json(set: &PackageSet) -> Map<String, Value> {
    let mut node = Map::new();
    for (id, versions) in set.groups() {
        if versions.is_empty() {
            continue;
        }

        let rendered = versions
            .iter()
            .rev()
            .map(|v| Value::String(v.to_string()))
            .collect();
        node.insert(id.to_string(), Value::Array(rendered));
    }
    node
}

/// Parse an index document into package sets.
pub fn from_json(json: &Value) -> IndexResult<PackageSets> {
    let root = json
        .as_object()
        .ok_or_else(|| IndexError::DataFormat("document root is not an object".to_string()))?;

    let packages = match root.get(PackageCategory::Packages.json_key()) {
        Some(node) => set_from_json(PackageCategory::Packages, node)?,
        None => return Err(IndexError::DataFormat("packages node missing".to_string())),
    };

    let symbols = match root.get(PackageCategory::Symbols.json_key()) {
        Some(node) if !node.is_null() => set_from_json(PackageCategory::Symbols, node)?,
        _ => {
            debug!("Index document has no symbols node, treating as empty");
            PackageSet::new()
        }
    };

    Ok(PackageSets { packages, symbols })
}

fn set_from_json(category: PackageCategory, node: &Value) -> IndexResult<PackageSet> {
    let entries = node
        .as_object()
        .ok_or_else(|| IndexError::DataFormat(format!("{} node is not an object", category)))?;

    let mut set = PackageSet::new();
    for (id, versions) in entries {
        let versions = versions.as_array().ok_or_else(|| {
            IndexError::DataFormat(format!("{} entry '{}' is not an array", category, id))
        })?;

        for value in versions {
            let text = value.as_str().ok_or_else(|| {
                IndexError::DataFormat(format!(
                    "{} entry '{}' contains a non-string version",
                    category, id
                ))
            })?;

            let version =
                PackageVersion::parse(text).map_err(|source| IndexError::InvalidVersion {
                    id: id.clone(),
                    value: text.to_string(),
                    source,
                })?;

            set.insert(PackageIdentity::new(id.clone(), version));
        }
    }

    Ok(set)
}
