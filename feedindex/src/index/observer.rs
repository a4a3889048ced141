//! Hooks around the persist step.
//!
//! An [`IndexDocument`](super::IndexDocument) calls its observer immediately
//! before and after every save. Observers never influence the outcome of the
//! save and are optional, so tests can run without them.
//!
//! # Shipped Observers
//!
//! - [`TracingObserver`] - logs each save with its duration
//! - [`PersistMetrics`] - lock-free counters with a point-in-time snapshot

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};

/// Details of a completed save.
#[derive(Debug, Clone)]
pub struct PersistEvent {
    /// Store location the document was saved to.
    pub location: String,

    /// Whether both package sets were empty.
    pub is_empty: bool,

    /// Number of identities in the packages set.
    pub packages: usize,

    /// Number of identities in the symbols set.
    pub symbols: usize,

    /// Time spent in the store.
    pub duration: Duration,

    /// Whether the store reported success.
    pub succeeded: bool,
}

/// Observer invoked around each persist.
pub trait PersistObserver: Send + Sync {
    /// Called before the document is handed to the store.
    fn on_persist_start(&self, _location: &str) {}

    /// Called after the store returns, successfully or not.
    fn on_persist_complete(&self, _event: &PersistEvent) {}
}

/// Logs persist timing through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PersistObserver for TracingObserver {
    fn on_persist_start(&self, location: &str) {
        debug!(location, "Persisting package index");
    }

    fn on_persist_complete(&self, event: &PersistEvent) {
        if event.succeeded {
            info!(
                location = %event.location,
                packages = event.packages,
                symbols = event.symbols,
                empty = event.is_empty,
                duration_ms = event.duration.as_millis() as u64,
                "Persisted package index"
            );
        } else {
            warn!(
                location = %event.location,
                duration_ms = event.duration.as_millis() as u64,
                "Failed to persist package index"
            );
        }
    }
}

/// Counters for persist activity.
#[derive(Debug, Default)]
pub struct PersistMetrics {
    started: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    empty: AtomicU64,
    total_duration_us: AtomicU64,
}

impl PersistMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a point-in-time copy of the counters.
    pub fn snapshot(&self) -> PersistSnapshot {
        PersistSnapshot {
            started: self.started.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            empty: self.empty.load(Ordering::Relaxed),
            total_duration: Duration::from_micros(self.total_duration_us.load(Ordering::Relaxed)),
        }
    }
}

impl PersistObserver for PersistMetrics {
    fn on_persist_start(&self, _location: &str) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    fn on_persist_complete(&self, event: &PersistEvent) {
        if event.succeeded {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        if event.is_empty {
            self.empty.fetch_add(1, Ordering::Relaxed);
        }
        self.total_duration_us
            .fetch_add(event.duration.as_micros() as u64, Ordering::Relaxed);
    }
}

/// Point-in-time copy of [`PersistMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersistSnapshot {
    pub started: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Saves of a document with no packages or symbols.
    pub empty: u64,
    pub total_duration: Duration,
}

impl fmt::Display for PersistSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "persists: {} started, {} succeeded, {} failed ({} empty) in {}ms",
            self.started,
            self.succeeded,
            self.failed,
            self.empty,
            self.total_duration.as_millis()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(succeeded: bool, is_empty: bool) -> PersistEvent {
        PersistEvent {
            location: "memory".to_string(),
            is_empty,
            packages: 0,
            symbols: 0,
            duration: Duration::from_millis(2),
            succeeded,
        }
    }

    #[test]
    fn test_metrics_counts() {
        let metrics = PersistMetrics::new();

        metrics.on_persist_start("memory");
        metrics.on_persist_complete(&event(true, false));
        metrics.on_persist_start("memory");
        metrics.on_persist_complete(&event(false, true));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.started, 2);
        assert_eq!(snapshot.succeeded, 1);
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.empty, 1);
        assert_eq!(snapshot.total_duration, Duration::from_millis(4));
    }

    #[test]
    fn test_snapshot_display() {
        let snapshot = PersistSnapshot {
            started: 3,
            succeeded: 2,
            failed: 1,
            empty: 0,
            total_duration: Duration::from_millis(12),
        };
        assert_eq!(
            snapshot.to_string(),
            "persists: 3 started, 2 succeeded, 1 failed (0 empty) in 12ms"
        );
    }

    #[test]
    fn test_tracing_observer_does_not_panic() {
        let observer = TracingObserver;
        observer.on_persist_start("memory");
        observer.on_persist_complete(&event(true, false));
        observer.on_persist_complete(&event(false, false));
    }
}
