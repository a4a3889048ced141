//! Package identity type.
//!
//! A [`PackageIdentity`] names one published package artifact: a package id
//! plus a version. Ids are matched case-insensitively everywhere in the index,
//! so `Newtonsoft.Json` and `newtonsoft.json` name the same package.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::version::PackageVersion;

/// Normalize a package id for case-insensitive comparison.
pub(super) fn id_key(id: &str) -> String {
    id.to_lowercase()
}

/// Core package identity.
///
/// The id keeps the case it was created with for display and serialization,
/// but equality, ordering and hashing ignore case.
///
/// # Example
///
/// ```
/// use feedindex::{PackageIdentity, PackageVersion};
///
/// let a = PackageIdentity::new("Foo", PackageVersion::new(1, 0, 0));
/// let b = PackageIdentity::new("foo", PackageVersion::new(1, 0, 0));
///
/// assert_eq!(a, b);
/// assert_eq!(a.id, "Foo");
/// assert_eq!(a.to_string(), "Foo 1.0.0");
/// ```
#[derive(Debug, Clone)]
pub struct PackageIdentity {
    /// Package id, case preserved.
    pub id: String,

    /// Package version.
    pub version: PackageVersion,
}

impl PackageIdentity {
    /// Create a new package identity.
    pub fn new(id: impl Into<String>, version: PackageVersion) -> Self {
        Self {
            id: id.into(),
            version,
        }
    }

    /// Check whether this identity has the given id, ignoring case.
    pub fn has_id(&self, id: &str) -> bool {
        self.id == id || id_key(&self.id) == id_key(id)
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.version)
    }
}

impl PartialEq for PackageIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PackageIdentity {}

impl PartialOrd for PackageIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageIdentity {
    fn cmp(&self, other: &Self) -> Ordering {
        id_key(&self.id)
            .cmp(&id_key(&other.id))
            .then_with(|| self.version.cmp(&other.version))
    }
}

impl Hash for PackageIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        id_key(&self.id).hash(state);
        self.version.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn identity(id: &str, version: &str) -> PackageIdentity {
        PackageIdentity::new(id, PackageVersion::parse(version).unwrap())
    }

    #[test]
    fn test_identity_new() {
        let pkg = identity("Foo.Bar", "1.2.3");

        assert_eq!(pkg.id, "Foo.Bar");
        assert_eq!(pkg.version, PackageVersion::new(1, 2, 3));
    }

    #[test]
    fn test_identity_equality_ignores_id_case() {
        assert_eq!(identity("Foo", "1.0.0"), identity("foo", "1.0.0"));
        assert_ne!(identity("Foo", "1.0.0"), identity("Bar", "1.0.0"));
        assert_ne!(identity("Foo", "1.0.0"), identity("Foo", "2.0.0"));
    }

    #[test]
    fn test_identity_equality_ignores_metadata() {
        assert_eq!(identity("Foo", "1.0.0+a"), identity("Foo", "1.0.0+b"));
    }

    #[test]
    fn test_identity_hash_consistent_with_eq() {
        let mut set = HashSet::new();
        set.insert(identity("Foo", "1.0.0"));

        assert!(set.contains(&identity("FOO", "1.0.0")));
        assert!(!set.insert(identity("foo", "1.0.0")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_identity_ordering() {
        let mut ids = vec![
            identity("b", "1.0.0"),
            identity("A", "2.0.0"),
            identity("a", "1.0.0"),
        ];
        ids.sort();

        assert_eq!(ids[0].to_string(), "a 1.0.0");
        assert_eq!(ids[1].to_string(), "A 2.0.0");
        assert_eq!(ids[2].to_string(), "b 1.0.0");
    }

    #[test]
    fn test_identity_has_id() {
        let pkg = identity("Foo.Bar", "1.0.0");
        assert!(pkg.has_id("foo.bar"));
        assert!(pkg.has_id("FOO.BAR"));
        assert!(!pkg.has_id("foo"));
    }

    #[test]
    fn test_identity_display() {
        assert_eq!(identity("Foo", "1.0.0-beta").to_string(), "Foo 1.0.0-beta");
    }
}
