//! Counters for coordinator activity.

use std::sync::atomic::{AtomicU64, Ordering};

/// Coordinator metrics.
pub struct CoordinatorMetrics {
    /// Rate requests sent to the provider.
    pub rate_fetches_dispatched: AtomicU64,
    /// Rate requests applied successfully.
    pub rate_fetches_succeeded: AtomicU64,
    /// Rate requests that failed.
    pub rate_fetches_failed: AtomicU64,
    /// Insight requests sent to the provider.
    pub insight_fetches_dispatched: AtomicU64,
    /// Insight requests replaced by the fallback insight.
    pub insight_fallbacks: AtomicU64,
    /// Results discarded because a newer request was dispatched.
    pub stale_results_discarded: AtomicU64,
    /// Edits rejected with a notice.
    pub edits_rejected: AtomicU64,
}

impl CoordinatorMetrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self {
            rate_fetches_dispatched: AtomicU64::new(0),
            rate_fetches_succeeded: AtomicU64::new(0),
            rate_fetches_failed: AtomicU64::new(0),
            insight_fetches_dispatched: AtomicU64::new(0),
            insight_fallbacks: AtomicU64::new(0),
            stale_results_discarded: AtomicU64::new(0),
            edits_rejected: AtomicU64::new(0),
        }
    }

    pub fn rate_fetch_dispatched(&self) {
        self.rate_fetches_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rate_fetch_succeeded(&self) {
        self.rate_fetches_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rate_fetch_failed(&self) {
        self.rate_fetches_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn insight_fetch_dispatched(&self) {
        self.insight_fetches_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn insight_fallback(&self) {
        self.insight_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stale_result_discarded(&self) {
        self.stale_results_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn edit_rejected(&self) {
        self.edits_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rate_fetches_dispatched: self.rate_fetches_dispatched.load(Ordering::Relaxed),
            rate_fetches_succeeded: self.rate_fetches_succeeded.load(Ordering::Relaxed),
            rate_fetches_failed: self.rate_fetches_failed.load(Ordering::Relaxed),
            insight_fetches_dispatched: self.insight_fetches_dispatched.load(Ordering::Relaxed),
            insight_fallbacks: self.insight_fallbacks.load(Ordering::Relaxed),
            stale_results_discarded: self.stale_results_discarded.load(Ordering::Relaxed),
            edits_rejected: self.edits_rejected.load(Ordering::Relaxed),
        }
    }
}

impl Default for CoordinatorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub rate_fetches_dispatched: u64,
    pub rate_fetches_succeeded: u64,
    pub rate_fetches_failed: u64,
    pub insight_fetches_dispatched: u64,
    pub insight_fallbacks: u64,
    pub stale_results_discarded: u64,
    pub edits_rejected: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = CoordinatorMetrics::new();
        metrics.rate_fetch_dispatched();
        metrics.rate_fetch_dispatched();
        metrics.rate_fetch_failed();
        metrics.edit_rejected();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.rate_fetches_dispatched, 2);
        assert_eq!(snapshot.rate_fetches_failed, 1);
        assert_eq!(snapshot.rate_fetches_succeeded, 0);
        assert_eq!(snapshot.edits_rejected, 1);
    }
}
