//! Package version parsing and comparison.
//!
//! Feed versions extend semantic versioning with an optional fourth numeric
//! component (the revision) and accept short forms such as `1.0`. Prerelease
//! labels and build metadata follow semver identifier rules and are validated
//! through the [`semver`] crate.
//!
//! # Canonical Form
//!
//! ```text
//! major.minor.patch[.revision][-prerelease][+metadata]
//! ```
//!
//! The revision is only rendered when it is non-zero, so `1.0.0.0` and `1.0`
//! both render as `1.0.0`. Canonical strings always re-parse to an equal
//! version.
//!
//! # Equality
//!
//! Build metadata is carried for display but ignored by equality, ordering
//! and hashing: `1.0.0+build.1` and `1.0.0+build.2` are the same version.
//!
//! Prerelease labels compare with semver precedence, which is case-sensitive:
//! `1.0.0-Beta` and `1.0.0-beta` are different versions, and `1.0.0-Beta`
//! sorts below `1.0.0-alpha` because uppercase letters order first in ASCII.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use semver::{BuildMetadata, Prerelease};
use thiserror::Error;

/// Maximum number of numeric components (`major.minor.patch.revision`).
const MAX_NUMERIC_PARTS: usize = 4;

/// Errors that can occur while parsing a version string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The input was empty.
    #[error("empty version string")]
    Empty,

    /// More than four numeric components were supplied.
    #[error("too many numeric components in '{0}' (max 4)")]
    TooManyParts(String),

    /// A numeric component was empty or not a number.
    #[error("invalid numeric component '{part}' in '{input}'")]
    InvalidNumber { input: String, part: String },

    /// The prerelease label is not a valid semver prerelease.
    #[error("invalid prerelease label in '{input}': {reason}")]
    InvalidPrerelease { input: String, reason: String },

    /// The build metadata is not valid semver metadata.
    #[error("invalid build metadata in '{input}': {reason}")]
    InvalidMetadata { input: String, reason: String },
}

/// A parsed, comparable package version.
///
/// # Example
///
/// ```
/// use feedindex::PackageVersion;
///
/// let version: PackageVersion = "1.2.3-beta.1+abc".parse().unwrap();
/// assert_eq!(version.to_string(), "1.2.3-beta.1+abc");
/// assert!(version.is_prerelease());
///
/// let short = PackageVersion::parse("1.0").unwrap();
/// assert_eq!(short.to_string(), "1.0.0");
/// ```
#[derive(Debug, Clone)]
pub struct PackageVersion {
    major: u64,
    minor: u64,
    patch: u64,
    revision: u64,
    pre: Prerelease,
    build: BuildMetadata,
}

impl PackageVersion {
    /// Create a release version from its three main components.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            revision: 0,
            pre: Prerelease::EMPTY,
            build: BuildMetadata::EMPTY,
        }
    }

    /// Set the fourth numeric component.
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    /// Parse a version string.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        if input.is_empty() {
            return Err(VersionError::Empty);
        }

        let (rest, build) = match input.split_once('+') {
            Some((rest, meta)) => {
                if meta.is_empty() {
                    return Err(VersionError::InvalidMetadata {
                        input: input.to_string(),
                        reason: "empty metadata".to_string(),
                    });
                }
                let build =
                    BuildMetadata::new(meta).map_err(|e| VersionError::InvalidMetadata {
                        input: input.to_string(),
                        reason: e.to_string(),
                    })?;
                (rest, build)
            }
            None => (input, BuildMetadata::EMPTY),
        };

        let (core, pre) = match rest.split_once('-') {
            Some((core, label)) => {
                // Prerelease::new accepts an empty label.
                if label.is_empty() {
                    return Err(VersionError::InvalidPrerelease {
                        input: input.to_string(),
                        reason: "empty label".to_string(),
                    });
                }
                let pre = Prerelease::new(label).map_err(|e| VersionError::InvalidPrerelease {
                    input: input.to_string(),
                    reason: e.to_string(),
                })?;
                (core, pre)
            }
            None => (rest, Prerelease::EMPTY),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > MAX_NUMERIC_PARTS {
            return Err(VersionError::TooManyParts(input.to_string()));
        }

        let mut numbers = [0u64; MAX_NUMERIC_PARTS];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionError::InvalidNumber {
                    input: input.to_string(),
                    part: part.to_string(),
                });
            }
            *slot = part.parse().map_err(|_| VersionError::InvalidNumber {
                input: input.to_string(),
                part: part.to_string(),
            })?;
        }

        Ok(Self {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
            revision: numbers[3],
            pre,
            build,
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Prerelease label, empty for releases.
    pub fn prerelease(&self) -> &str {
        self.pre.as_str()
    }

    /// Build metadata, empty when absent.
    pub fn metadata(&self) -> &str {
        self.build.as_str()
    }

    /// Check if this version carries a prerelease label.
    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    fn numeric(&self) -> [u64; MAX_NUMERIC_PARTS] {
        [self.major, self.minor, self.patch, self.revision]
    }
}

impl From<semver::Version> for PackageVersion {
    fn from(version: semver::Version) -> Self {
        Self {
            major: version.major,
            minor: version.minor,
            patch: version.patch,
            revision: 0,
            pre: version.pre,
            build: version.build,
        }
    }
}

impl FromStr for PackageVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.revision > 0 {
            write!(f, ".{}", self.revision)?;
        }
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PackageVersion {}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // semver's Prerelease ordering puts the empty (release) label last.
        self.numeric()
            .cmp(&other.numeric())
            .then_with(|| self.pre.cmp(&other.pre))
    }
}

impl Hash for PackageVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.numeric().hash(state);
        self.pre.hash(state);
    }
}
