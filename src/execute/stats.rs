//! Live counters for a running plan, polled by progress displays.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Thread-safe counters updated by executor tasks.
#[derive(Debug, Default)]
pub struct ExecutionStats {
    fetched: AtomicUsize,
    failed: AtomicUsize,
    retried: AtomicUsize,
    deleted: AtomicUsize,
}

impl ExecutionStats {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks fetched successfully.
    #[must_use]
    pub fn fetched(&self) -> usize {
        self.fetched.load(Ordering::SeqCst)
    }

    /// Items (fetches or deletions) that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Retry attempts made.
    #[must_use]
    pub fn retried(&self) -> usize {
        self.retried.load(Ordering::SeqCst)
    }

    /// Files deleted.
    #[must_use]
    pub fn deleted(&self) -> usize {
        self.deleted.load(Ordering::SeqCst)
    }

    /// Items finished, successful or not.
    #[must_use]
    pub fn done(&self) -> usize {
        self.fetched() + self.failed() + self.deleted()
    }

    pub(super) fn increment_fetched(&self) {
        self.fetched.fetch_add(1, Ordering::SeqCst);
    }

    pub(super) fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    pub(super) fn increment_retried(&self) {
        self.retried.fetch_add(1, Ordering::SeqCst);
    }

    pub(super) fn increment_deleted(&self) {
        self.deleted.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_stats_start_at_zero() {
        let stats = ExecutionStats::new();
        assert_eq!(stats.done(), 0);
        assert_eq!(stats.retried(), 0);
    }

    #[test]
    fn test_stats_thread_safe() {
        let stats = Arc::new(ExecutionStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..50 {
                        stats.increment_fetched();
                        stats.increment_failed();
                        stats.increment_retried();
                        stats.increment_deleted();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(stats.fetched(), 400);
        assert_eq!(stats.failed(), 400);
        assert_eq!(stats.retried(), 400);
        assert_eq!(stats.deleted(), 400);
        assert_eq!(stats.done(), 1200);
    }
}
