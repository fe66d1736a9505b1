use serde::Serialize;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    items_attempted: AtomicU64,
    items_succeeded: AtomicU64,
    items_failed: AtomicU64,
    items_skipped: AtomicU64,
    bytes_written: AtomicU64,
}

/// Counters for one batch run. Cheap to clone; clones share the counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub items_attempted: u64,
    pub items_succeeded: u64,
    pub items_failed: u64,
    pub items_skipped: u64,
    pub bytes_written: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn increment_attempted(&self) {
        self.inner.items_attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_succeeded(&self) {
        self.inner.items_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a failed item; skips are failures too and bump both counters.
    pub fn increment_failed(&self, skipped: bool) {
        self.inner.items_failed.fetch_add(1, Ordering::Relaxed);
        if skipped {
            self.inner.items_skipped.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_bytes(&self, count: u64) {
        self.inner.bytes_written.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            items_attempted: self.inner.items_attempted.load(Ordering::Relaxed),
            items_succeeded: self.inner.items_succeeded.load(Ordering::Relaxed),
            items_failed: self.inner.items_failed.load(Ordering::Relaxed),
            items_skipped: self.inner.items_skipped.load(Ordering::Relaxed),
            bytes_written: self.inner.bytes_written.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
