//! The package index document.
//!
//! [`IndexDocument`] owns the load → mutate → persist flow for one persisted
//! index. Nothing is cached between calls: every operation loads the current
//! document from its store, works on a fresh [`PackageSets`], and either
//! discards it (queries) or writes it back (mutations).
//!
//! # Write Gating
//!
//! - Adds always persist, even when every identity was already present.
//! - Removes persist only when at least one identity was actually removed.
//!
//! # Concurrency
//!
//! There is no locking or conflict detection. Two concurrent mutations of the
//! same store race and one update can be lost; callers serialize publishing
//! sessions themselves.
//!
//! # Cancellation
//!
//! The document's [`CancellationToken`] is checked at each I/O boundary
//! (existence check, fetch, save). In-memory mutation and serialization are
//! never interrupted.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::codec;
use super::error::{IndexError, IndexResult};
use super::observer::{PersistEvent, PersistObserver};
use super::operations::{apply_add_remove, AddRemovePackages, IndexOperations};
use crate::package::{PackageCategory, PackageIdentity, PackageSet, PackageSets};
use crate::store::{BoxFuture, IndexStore};
use crate::version::PackageVersion;

/// Persisted index of the packages and symbols packages in a feed.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use feedindex::{IndexDocument, MemoryIndexStore, PackageIdentity, PackageVersion};
///
/// # let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// # runtime.block_on(async {
/// let doc = IndexDocument::new(Arc::new(MemoryIndexStore::new()));
/// doc.add_package(PackageIdentity::new("Foo", PackageVersion::new(1, 0, 0))).await?;
///
/// assert!(doc.exists("foo", &PackageVersion::new(1, 0, 0)).await?);
/// # Ok::<(), feedindex::IndexError>(())
/// # }).unwrap();
/// ```
pub struct IndexDocument {
    store: Arc<dyn IndexStore>,
    observer: Option<Arc<dyn PersistObserver>>,
    cancellation: CancellationToken,
}

impl IndexDocument {
    /// Create a document backed by the given store.
    pub fn new(store: Arc<dyn IndexStore>) -> Self {
        Self {
            store,
            observer: None,
            cancellation: CancellationToken::new(),
        }
    }

    /// Attach an observer invoked around every persist.
    pub fn with_observer(mut self, observer: Arc<dyn PersistObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Use the given token to cancel pending I/O.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Location of the backing store.
    pub fn location(&self) -> String {
        self.store.location()
    }

    // ---------------------------------------------------------------------
    // Load / persist
    // ---------------------------------------------------------------------

    /// Load the package sets from the persisted document.
    ///
    /// Returns empty sets when no document exists yet.
    ///
    /// # Errors
    ///
    /// - [`IndexError::DataFormat`] if the `packages` node is missing
    /// - [`IndexError::InvalidVersion`] if a version string fails to parse
    /// - store read errors
    pub async fn load(&self) -> IndexResult<PackageSets> {
        if !self.io(self.store.exists()).await? {
            debug!(location = %self.store.location(), "No index document, using empty sets");
            return Ok(PackageSets::new());
        }

        let json = self
            .io(self.store.fetch_json_or_template(codec::template()))
            .await?;
        let sets = codec::from_json(&json)?;

        debug!(
            location = %self.store.location(),
            packages = sets.packages.len(),
            symbols = sets.symbols.len(),
            "Loaded package index"
        );
        Ok(sets)
    }

    /// Write the sets directly, without loading the current document.
    ///
    /// Used when the caller already holds the authoritative state.
    pub async fn create(&self, sets: &PackageSets) -> IndexResult<()> {
        self.persist(sets).await
    }

    async fn persist(&self, sets: &PackageSets) -> IndexResult<()> {
        let json = codec::to_json(sets);
        let is_empty = sets.is_empty();
        let location = self.store.location();

        if let Some(observer) = &self.observer {
            observer.on_persist_start(&location);
        }

        let start = Instant::now();
        let result = self.io(self.store.save(json, is_empty)).await;

        if let Some(observer) = &self.observer {
            observer.on_persist_complete(&PersistEvent {
                location,
                is_empty,
                packages: sets.packages.len(),
                symbols: sets.symbols.len(),
                duration: start.elapsed(),
                succeeded: result.is_ok(),
            });
        }

        result
    }

    /// Run an I/O future, abandoning it if the document is cancelled.
    async fn io<T, F>(&self, future: F) -> IndexResult<T>
    where
        F: Future<Output = IndexResult<T>>,
    {
        if self.cancellation.is_cancelled() {
            warn!(location = %self.store.location(), "Index operation cancelled");
            return Err(IndexError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => {
                warn!(location = %self.store.location(), "Index operation cancelled");
                Err(IndexError::Cancelled)
            }
            result = future => result,
        }
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Load, apply `mutation`, and persist if `always_persist` or the mutation
    /// reports a change. Returns the mutation's change flag.
    async fn mutate<F>(
        &self,
        category: PackageCategory,
        always_persist: bool,
        mutation: F,
    ) -> IndexResult<bool>
    where
        F: FnOnce(&mut PackageSet) -> bool,
    {
        let mut sets = self.load().await?;
        let changed = mutation(sets.get_mut(category));

        if changed || always_persist {
            self.persist(&sets).await?;
        } else {
            debug!(%category, location = %self.store.location(), "Nothing changed, skipping write");
        }
        Ok(changed)
    }

    async fn add_to(
        &self,
        category: PackageCategory,
        identities: Vec<PackageIdentity>,
    ) -> IndexResult<()> {
        let count = identities.len();
        let changed = self
            .mutate(category, true, |set| set.extend_from(identities))
            .await?;
        info!(%category, count, changed, "Added packages to index");
        Ok(())
    }

    async fn remove_from(
        &self,
        category: PackageCategory,
        identities: Vec<PackageIdentity>,
    ) -> IndexResult<bool> {
        let count = identities.len();
        let changed = self
            .mutate(category, false, |set| set.remove_all(&identities))
            .await?;
        if changed {
            info!(%category, count, "Removed packages from index");
        }
        Ok(changed)
    }

    /// Add one package. The document is always rewritten.
    pub async fn add_package(&self, identity: PackageIdentity) -> IndexResult<()> {
        self.add_to(PackageCategory::Packages, vec![identity]).await
    }

    /// Add several packages in one write.
    pub async fn add_packages<I>(&self, identities: I) -> IndexResult<()>
    where
        I: IntoIterator<Item = PackageIdentity>,
    {
        self.add_to(PackageCategory::Packages, identities.into_iter().collect())
            .await
    }

    /// Remove one package. Returns true if it was present; nothing is written
    /// otherwise.
    pub async fn remove_package(&self, identity: &PackageIdentity) -> IndexResult<bool> {
        self.remove_from(PackageCategory::Packages, vec![identity.clone()])
            .await
    }

    /// Remove several packages. Returns true if any was present; nothing is
    /// written otherwise.
    pub async fn remove_packages<I>(&self, identities: I) -> IndexResult<bool>
    where
        I: IntoIterator<Item = PackageIdentity>,
    {
        self.remove_from(PackageCategory::Packages, identities.into_iter().collect())
            .await
    }

    /// Add one symbols package. The document is always rewritten.
    pub async fn add_symbols_package(&self, identity: PackageIdentity) -> IndexResult<()> {
        self.add_to(PackageCategory::Symbols, vec![identity]).await
    }

    pub async fn add_symbols_packages<I>(&self, identities: I) -> IndexResult<()>
    where
        I: IntoIterator<Item = PackageIdentity>,
    {
        self.add_to(PackageCategory::Symbols, identities.into_iter().collect())
            .await
    }

    /// Remove one symbols package, writing only if it was present.
    pub async fn remove_symbols_package(&self, identity: &PackageIdentity) -> IndexResult<bool> {
        self.remove_from(PackageCategory::Symbols, vec![identity.clone()])
            .await
    }

    pub async fn remove_symbols_packages<I>(&self, identities: I) -> IndexResult<bool>
    where
        I: IntoIterator<Item = PackageIdentity>,
    {
        self.remove_from(PackageCategory::Symbols, identities.into_iter().collect())
            .await
    }

    /// Apply batched add/remove operations to this document.
    pub async fn apply_operations(&self, operations: &IndexOperations) -> IndexResult<()> {
        apply_add_remove(self, operations).await
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// All packages.
    pub async fn get_packages(&self) -> IndexResult<PackageSet> {
        Ok(self.load().await?.packages)
    }

    /// All symbols packages.
    pub async fn get_symbols_packages(&self) -> IndexResult<PackageSet> {
        Ok(self.load().await?.symbols)
    }

    /// Packages with the given id (any case), version ascending.
    pub async fn get_packages_by_id(&self, id: &str) -> IndexResult<Vec<PackageIdentity>> {
        require_id(id)?;
        Ok(self.load().await?.packages.by_id(id))
    }

    /// Symbols packages with the given id (any case), version ascending.
    pub async fn get_symbols_packages_by_id(&self, id: &str) -> IndexResult<Vec<PackageIdentity>> {
        require_id(id)?;
        Ok(self.load().await?.symbols.by_id(id))
    }

    /// Versions of the given package, ascending.
    pub async fn get_package_versions(&self, id: &str) -> IndexResult<Vec<PackageVersion>> {
        require_id(id)?;
        Ok(self.load().await?.packages.versions(id))
    }

    /// Versions of the given symbols package, ascending.
    pub async fn get_symbols_package_versions(&self, id: &str) -> IndexResult<Vec<PackageVersion>> {
        require_id(id)?;
        Ok(self.load().await?.symbols.versions(id))
    }

    /// Check whether the exact package is listed.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidArgument`] if `id` is blank.
    pub async fn exists(&self, id: &str, version: &PackageVersion) -> IndexResult<bool> {
        require_id(id)?;
        Ok(self.load().await?.packages.contains_version(id, version))
    }

    /// Check whether the exact symbols package is listed.
    pub async fn symbols_exists(&self, id: &str, version: &PackageVersion) -> IndexResult<bool> {
        require_id(id)?;
        Ok(self.load().await?.symbols.contains_version(id, version))
    }

    /// True when neither packages nor symbols packages are listed.
    pub async fn is_empty(&self) -> IndexResult<bool> {
        Ok(self.load().await?.is_empty())
    }

    /// True when the store holds a persisted document.
    ///
    /// Stores that drop empty documents report false after an empty save.
    pub async fn is_persisted(&self) -> IndexResult<bool> {
        self.io(self.store.exists()).await
    }
}

impl AddRemovePackages for IndexDocument {
    fn add(
        &self,
        category: PackageCategory,
        identities: Vec<PackageIdentity>,
    ) -> BoxFuture<'_, IndexResult<()>> {
        Box::pin(self.add_to(category, identities))
    }

    fn remove(
        &self,
        category: PackageCategory,
        identities: Vec<PackageIdentity>,
    ) -> BoxFuture<'_, IndexResult<bool>> {
        Box::pin(self.remove_from(category, identities))
    }
}

fn require_id(id: &str) -> IndexResult<()> {
    if id.trim().is_empty() {
        return Err(IndexError::InvalidArgument(
            "package id is required".to_string(),
        ));
    }
    Ok(())
}
