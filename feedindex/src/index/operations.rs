//! Batched add/remove operations.
//!
//! A feed-wide publish decides which packages to add and remove and hands the
//! result over as an [`IndexOperations`]. [`apply_add_remove`] replays those
//! batches against anything implementing [`AddRemovePackages`], keeping the
//! index document independent from the policy that produced them.

use tracing::debug;

use super::error::IndexResult;
use crate::package::{PackageCategory, PackageIdentity, PackageSets};
use crate::store::BoxFuture;

/// The add/remove contract of an index.
pub trait AddRemovePackages: Send + Sync {
    /// Union the identities into the category's set.
    fn add(
        &self,
        category: PackageCategory,
        identities: Vec<PackageIdentity>,
    ) -> BoxFuture<'_, IndexResult<()>>;

    /// Remove the identities from the category's set.
    ///
    /// Returns true if anything was removed.
    fn remove(
        &self,
        category: PackageCategory,
        identities: Vec<PackageIdentity>,
    ) -> BoxFuture<'_, IndexResult<bool>>;
}

/// Identities to add and remove, per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexOperations {
    pub to_add: PackageSets,
    pub to_remove: PackageSets,
}

impl IndexOperations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operations that turn `current` into `desired`.
    pub fn from_diff(current: &PackageSets, desired: &PackageSets) -> Self {
        let mut ops = Self::new();
        for category in PackageCategory::ALL {
            let have = current.get(category);
            let want = desired.get(category);

            ops.to_add
                .get_mut(category)
                .extend(want.iter().filter(|p| !have.contains(p)));
            ops.to_remove
                .get_mut(category)
                .extend(have.iter().filter(|p| !want.contains(p)));
        }
        ops
    }

    /// True when there is nothing to add or remove.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Apply operations to a target.
///
/// Removals run before additions, so an identity listed in both batches ends
/// up present. Empty batches are skipped entirely.
pub async fn apply_add_remove<T>(target: &T, operations: &IndexOperations) -> IndexResult<()>
where
    T: AddRemovePackages + ?Sized,
{
    for category in PackageCategory::ALL {
        let to_remove = operations.to_remove.get(category);
        if !to_remove.is_empty() {
            debug!(%category, count = to_remove.len(), "Removing packages");
            target.remove(category, to_remove.iter().collect()).await?;
        }

        let to_add = operations.to_add.get(category);
        if !to_add.is_empty() {
            debug!(%category, count = to_add.len(), "Adding packages");
            target.add(category, to_add.iter().collect()).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::PackageVersion;
    use parking_lot::Mutex;

    fn identity(id: &str, version: &str) -> PackageIdentity {
        PackageIdentity::new(id, PackageVersion::parse(version).unwrap())
    }

    /// Records calls instead of touching an index.
    #[derive(Default)]
    struct RecordingTarget {
        calls: Mutex<Vec<String>>,
    }

    impl AddRemovePackages for RecordingTarget {
        fn add(
            &self,
            category: PackageCategory,
            identities: Vec<PackageIdentity>,
        ) -> BoxFuture<'_, IndexResult<()>> {
            Box::pin(async move {
                self.calls
                    .lock()
                    .push(format!("add {} {}", category, identities.len()));
                Ok(())
            })
        }

        fn remove(
            &self,
            category: PackageCategory,
            identities: Vec<PackageIdentity>,
        ) -> BoxFuture<'_, IndexResult<bool>> {
            Box::pin(async move {
                self.calls
                    .lock()
                    .push(format!("remove {} {}", category, identities.len()));
                Ok(true)
            })
        }
    }

    #[tokio::test]
    async fn test_apply_order_and_skips_empty() {
        let target = RecordingTarget::default();
        let mut ops = IndexOperations::new();
        ops.to_add.packages.insert(identity("A", "1.0.0"));
        ops.to_add.packages.insert(identity("B", "1.0.0"));
        ops.to_remove.packages.insert(identity("A", "0.9.0"));
        ops.to_remove.symbols.insert(identity("A", "0.9.0"));

        apply_add_remove(&target, &ops).await.unwrap();

        assert_eq!(
            *target.calls.lock(),
            vec!["remove packages 1", "add packages 2", "remove symbols 1"]
        );
    }

    #[tokio::test]
    async fn test_apply_nothing() {
        let target = RecordingTarget::default();
        apply_add_remove(&target, &IndexOperations::new())
            .await
            .unwrap();
        assert!(target.calls.lock().is_empty());
    }

    #[test]
    fn test_from_diff() {
        let mut current = PackageSets::new();
        current.packages.insert(identity("A", "1.0.0"));
        current.packages.insert(identity("B", "1.0.0"));
        current.symbols.insert(identity("A", "1.0.0"));

        let mut desired = PackageSets::new();
        desired.packages.insert(identity("a", "1.0.0"));
        desired.packages.insert(identity("C", "1.0.0"));
        desired.symbols.insert(identity("A", "1.0.0"));

        let ops = IndexOperations::from_diff(&current, &desired);

        assert_eq!(ops.to_add.packages.iter().collect::<Vec<_>>(), vec![identity("C", "1.0.0")]);
        assert_eq!(
            ops.to_remove.packages.iter().collect::<Vec<_>>(),
            vec![identity("B", "1.0.0")]
        );
        assert!(ops.to_add.symbols.is_empty());
        assert!(ops.to_remove.symbols.is_empty());
        assert!(!ops.is_empty());

        assert!(IndexOperations::from_diff(&desired, &desired).is_empty());
    }
}
