//! The pair of package sets held by one index document.

use std::fmt;

use super::set::PackageSet;

/// Which identity set an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageCategory {
    /// Ordinary packages.
    Packages,
    /// Debug symbols packages.
    Symbols,
}

impl PackageCategory {
    /// Both categories, in document order.
    pub const ALL: [PackageCategory; 2] = [PackageCategory::Packages, PackageCategory::Symbols];

    /// Top-level JSON key for this category.
    pub fn json_key(&self) -> &'static str {
        match self {
            PackageCategory::Packages => "packages",
            PackageCategory::Symbols => "symbols",
        }
    }
}

impl fmt::Display for PackageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_key())
    }
}

/// Packages and symbols packages loaded from one document.
///
/// The two sets are independent: a package may be listed without its symbols
/// and vice versa.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSets {
    pub packages: PackageSet,
    pub symbols: PackageSet,
}

impl PackageSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when neither set has any members.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.symbols.is_empty()
    }

    pub fn get(&self, category: PackageCategory) -> &PackageSet {
        match category {
            PackageCategory::Packages => &self.packages,
            PackageCategory::Symbols => &self.symbols,
        }
    }

    pub fn get_mut(&mut self, category: PackageCategory) -> &mut PackageSet {
        match category {
            PackageCategory::Packages => &mut self.packages,
            PackageCategory::Symbols => &mut self.symbols,
        }
    }
}
