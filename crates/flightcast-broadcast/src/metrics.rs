//! Broadcast pipeline metrics.
//!
//! [`BroadcastMetrics`] is maintained by the fan-out layer and the batch
//! loop, giving monitoring a consistent view regardless of which
//! registry/transport implementations are plugged in.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters tracked across batch invocations.
#[derive(Debug)]
pub struct BroadcastMetrics {
    /// Total change records processed (failed or not).
    pub records_total: AtomicU64,

    /// Total batch invocations.
    pub batches_total: AtomicU64,

    /// Total successful deliveries to subscribers.
    pub deliveries_total: AtomicU64,

    /// Total stale subscribers pruned.
    pub stale_pruned_total: AtomicU64,

    /// Total non-stale delivery errors.
    pub errors_total: AtomicU64,
}

impl BroadcastMetrics {
    /// Creates a new metrics instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records_total: AtomicU64::new(0),
            batches_total: AtomicU64::new(0),
            deliveries_total: AtomicU64::new(0),
            stale_pruned_total: AtomicU64::new(0),
            errors_total: AtomicU64::new(0),
        }
    }

    /// Records a completed batch invocation.
    pub fn record_batch(&self, record_count: u64) {
        self.records_total.fetch_add(record_count, Ordering::Relaxed);
        self.batches_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one successful delivery.
    pub fn record_delivery(&self) {
        self.deliveries_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one stale subscriber pruning.
    pub fn record_stale_pruned(&self) {
        self.stale_pruned_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one non-stale delivery error.
    pub fn record_error(&self) {
        self.errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time snapshot of the counters.
    #[must_use]
    pub fn snapshot(&self) -> BroadcastMetricsSnapshot {
        BroadcastMetricsSnapshot {
            records_total: self.records_total.load(Ordering::Relaxed),
            batches_total: self.batches_total.load(Ordering::Relaxed),
            deliveries_total: self.deliveries_total.load(Ordering::Relaxed),
            stale_pruned_total: self.stale_pruned_total.load(Ordering::Relaxed),
            errors_total: self.errors_total.load(Ordering::Relaxed),
        }
    }
}

impl Default for BroadcastMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time snapshot of [`BroadcastMetrics`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastMetricsSnapshot {
    /// Total records processed.
    pub records_total: u64,

    /// Total batch invocations.
    pub batches_total: u64,

    /// Total successful deliveries.
    pub deliveries_total: u64,

    /// Total stale subscribers pruned.
    pub stale_pruned_total: u64,

    /// Total non-stale delivery errors.
    pub errors_total: u64,
}
