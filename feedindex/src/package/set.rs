//! Unique collection of package identities.
//!
//! [`PackageSet`] stores identities grouped by case-insensitive id, each group
//! holding an ordered set of versions:
//!
//! ```text
//! "newtonsoft.json" ─► IdGroup { id: "Newtonsoft.Json", versions: {12.0.1, 13.0.1} }
//! "serilog"         ─► IdGroup { id: "Serilog",         versions: {3.0.0} }
//! ```
//!
//! Lookups by id are a single map access, iteration is already in index order,
//! and adding an identity that is equal to an existing one leaves the set
//! untouched.

use std::collections::{BTreeMap, BTreeSet};

use super::identity::{id_key, PackageIdentity};
use crate::version::PackageVersion;

/// All versions recorded for one package id.
#[derive(Debug, Clone)]
struct IdGroup {
    /// Display id, as written by the most recent insertion into this group.
    id: String,

    versions: BTreeSet<PackageVersion>,
}

/// A set of package identities, unique by case-insensitive id and version.
///
/// # Example
///
/// ```
/// use feedindex::{PackageIdentity, PackageSet, PackageVersion};
///
/// let mut set = PackageSet::new();
/// assert!(set.insert(PackageIdentity::new("Foo", PackageVersion::new(1, 0, 0))));
/// assert!(!set.insert(PackageIdentity::new("foo", PackageVersion::new(1, 0, 0))));
///
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.versions("FOO"), vec![PackageVersion::new(1, 0, 0)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackageSet {
    groups: BTreeMap<String, IdGroup>,
}

impl PackageSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identities in the set.
    pub fn len(&self) -> usize {
        self.groups.values().map(|g| g.versions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Add an identity.
    ///
    /// Returns true if the identity was not already present. When a new
    /// version is added the group adopts the casing of the inserted id.
    pub fn insert(&mut self, identity: PackageIdentity) -> bool {
        let PackageIdentity { id, version } = identity;
        match self.groups.get_mut(&id_key(&id)) {
            Some(group) => {
                if group.versions.insert(version) {
                    group.id = id;
                    true
                } else {
                    false
                }
            }
            None => {
                let mut versions = BTreeSet::new();
                versions.insert(version);
                self.groups.insert(id_key(&id), IdGroup { id, versions });
                true
            }
        }
    }

    /// Remove an identity.
    ///
    /// Returns true if the identity was present.
    pub fn remove(&mut self, identity: &PackageIdentity) -> bool {
        let key = id_key(&identity.id);
        let Some(group) = self.groups.get_mut(&key) else {
            return false;
        };

        let removed = group.versions.remove(&identity.version);
        if group.versions.is_empty() {
            self.groups.remove(&key);
        }
        removed
    }

    /// Add every identity, returning true if any of them was new.
    pub fn extend_from<I>(&mut self, identities: I) -> bool
    where
        I: IntoIterator<Item = PackageIdentity>,
    {
        let mut changed = false;
        for identity in identities {
            changed |= self.insert(identity);
        }
        changed
    }

    /// Remove every identity, returning true if any of them was present.
    pub fn remove_all<'a, I>(&mut self, identities: I) -> bool
    where
        I: IntoIterator<Item = &'a PackageIdentity>,
    {
        let mut changed = false;
        for identity in identities {
            changed |= self.remove(identity);
        }
        changed
    }

    pub fn contains(&self, identity: &PackageIdentity) -> bool {
        self.contains_version(&identity.id, &identity.version)
    }

    /// Check for an exact id (any case) and version.
    pub fn contains_version(&self, id: &str, version: &PackageVersion) -> bool {
        self.groups
            .get(&id_key(id))
            .is_some_and(|g| g.versions.contains(version))
    }

    /// Check whether any version of the id is present.
    pub fn contains_id(&self, id: &str) -> bool {
        self.groups.contains_key(&id_key(id))
    }

    /// All identities for an id, ordered by version ascending.
    pub fn by_id(&self, id: &str) -> Vec<PackageIdentity> {
        self.groups
            .get(&id_key(id))
            .map(|g| {
                g.versions
                    .iter()
                    .map(|v| PackageIdentity::new(g.id.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All versions for an id, ordered ascending.
    pub fn versions(&self, id: &str) -> Vec<PackageVersion> {
        self.groups
            .get(&id_key(id))
            .map(|g| g.versions.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Display ids of every package in the set, case-insensitive order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.groups.values().map(|g| g.id.as_str())
    }

    /// Iterate identities by id (case-insensitive) then version ascending.
    pub fn iter(&self) -> impl Iterator<Item = PackageIdentity> + '_ {
        self.groups.values().flat_map(|g| {
            g.versions
                .iter()
                .map(move |v| PackageIdentity::new(g.id.clone(), v.clone()))
        })
    }

    /// Groups as `(display id, versions ascending)` in id order.
    pub(crate) fn groups(&self) -> impl Iterator<Item = (&str, &BTreeSet<PackageVersion>)> {
        self.groups
            .values()
            .map(|g| (g.id.as_str(), &g.versions))
    }
}

impl PartialEq for PackageSet {
    fn eq(&self, other: &Self) -> bool {
        self.groups.len() == other.groups.len()
            && self.groups.iter().all(|(key, group)| {
                other
                    .groups
                    .get(key)
                    .is_some_and(|o| o.versions == group.versions)
            })
    }
}

impl Eq for PackageSet {}

impl FromIterator<PackageIdentity> for PackageSet {
    fn from_iter<I: IntoIterator<Item = PackageIdentity>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend_from(iter);
        set
    }
}

impl Extend<PackageIdentity> for PackageSet {
    fn extend<I: IntoIterator<Item = PackageIdentity>>(&mut self, iter: I) {
        self.extend_from(iter);
    }
}

impl IntoIterator for PackageSet {
    type Item = PackageIdentity;
    type IntoIter = std::vec::IntoIter<PackageIdentity>;

    fn into_iter(self) -> Self::IntoIter {
        let mut identities = Vec::with_capacity(self.len());
        for group in self.groups.into_values() {
            for version in group.versions {
                identities.push(PackageIdentity::new(group.id.clone(), version));
            }
        }
        identities.into_iter()
    }
}
