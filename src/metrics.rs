use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing request activity since startup.
#[derive(Default)]
pub struct RequestMetrics {
    created: AtomicU64,
    listed: AtomicU64,
    fetched: AtomicU64,
    updated: AtomicU64,
    deleted: AtomicU64,
    not_found: AtomicU64,
}

impl RequestMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully created student.
    pub fn record_created(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed list request.
    pub fn record_listed(&self) {
        self.listed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful fetch by identifier.
    pub fn record_fetched(&self) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful partial update, including no-op updates.
    pub fn record_updated(&self) {
        self.updated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful delete.
    pub fn record_deleted(&self) {
        self.deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request that targeted a missing student.
    pub fn record_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            created: self.created.load(Ordering::Relaxed),
            listed: self.listed.load(Ordering::Relaxed),
            fetched: self.fetched.load(Ordering::Relaxed),
            updated: self.updated.load(Ordering::Relaxed),
            deleted: self.deleted.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of request counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Students created since startup.
    pub created: u64,
    /// List requests served since startup.
    pub listed: u64,
    /// Successful fetches by identifier.
    pub fetched: u64,
    /// Successful partial updates.
    pub updated: u64,
    /// Successful deletes.
    pub deleted: u64,
    /// Requests rejected because the student did not exist.
    pub not_found: u64,
}
