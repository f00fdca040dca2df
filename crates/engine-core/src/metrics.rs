use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    pages_fetched: AtomicU64,
    rows_scanned: AtomicU64,
    batches_processed: AtomicU64,
    lookups_succeeded: AtomicU64,
    lookups_failed: AtomicU64,
}

/// Run counters shared between the scanner and the enricher.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub pages_fetched: u64,
    pub rows_scanned: u64,
    pub batches_processed: u64,
    pub lookups_succeeded: u64,
    pub lookups_failed: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn increment_pages(&self, count: u64) {
        self.inner.pages_fetched.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_rows(&self, count: u64) {
        self.inner.rows_scanned.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_batches(&self, count: u64) {
        self.inner
            .batches_processed
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_lookups(&self, succeeded: u64, failed: u64) {
        self.inner
            .lookups_succeeded
            .fetch_add(succeeded, Ordering::Relaxed);
        self.inner.lookups_failed.fetch_add(failed, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pages_fetched: self.inner.pages_fetched.load(Ordering::Relaxed),
            rows_scanned: self.inner.rows_scanned.load(Ordering::Relaxed),
            batches_processed: self.inner.batches_processed.load(Ordering::Relaxed),
            lookups_succeeded: self.inner.lookups_succeeded.load(Ordering::Relaxed),
            lookups_failed: self.inner.lookups_failed.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
