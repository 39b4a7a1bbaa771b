//! Per-item results of applying a plan.

use std::path::PathBuf;

use crate::delete::DeleteError;
use crate::fetch::FetchError;
use crate::model::{LocalFile, Track};

/// Result of one plan item.
#[derive(Debug)]
pub enum ItemOutcome {
    /// Track written to `path`.
    Fetched {
        /// Fetched track.
        track: Track,
        /// Final file.
        path: PathBuf,
        /// Attempts used (1 when no retry happened).
        attempts: u32,
    },
    /// Track could not be fetched.
    FetchFailed {
        /// Track that failed.
        track: Track,
        /// Last error.
        error: FetchError,
        /// Attempts used.
        attempts: u32,
    },
    /// Track was not started because the run was interrupted.
    Cancelled {
        /// Track that was never attempted.
        track: Track,
    },
    /// Orphan removed.
    Deleted {
        /// Removed file.
        file: LocalFile,
    },
    /// Orphan could not be removed.
    DeleteFailed {
        /// File that remains.
        file: LocalFile,
        /// Failure.
        error: DeleteError,
    },
}

impl ItemOutcome {
    /// Whether this item failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed { .. } | Self::DeleteFailed { .. })
    }
}

/// Aggregate result of applying a plan.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    /// One outcome per fetch and delete item, fetches first in plan order.
    pub outcomes: Vec<ItemOutcome>,
    /// Tracks skipped because they already exist locally.
    pub skipped: usize,
    /// Retry attempts made across all fetches.
    pub retried: usize,
    /// Whether an interrupt stopped scheduling.
    pub interrupted: bool,
}

impl ExecutionReport {
    /// Tracks fetched.
    #[must_use]
    pub fn fetched(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Fetched { .. }))
    }

    /// Tracks that failed to fetch.
    #[must_use]
    pub fn fetch_failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::FetchFailed { .. }))
    }

    /// Tracks never attempted.
    #[must_use]
    pub fn cancelled(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Cancelled { .. }))
    }

    /// Orphans deleted.
    #[must_use]
    pub fn deleted(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Deleted { .. }))
    }

    /// Orphans that could not be deleted.
    #[must_use]
    pub fn delete_failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::DeleteFailed { .. }))
    }

    /// Failed items.
    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    /// Number of failed items.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.fetch_failed() + self.delete_failed()
    }

    /// Number of items that were attempted (excludes skips and cancellations).
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.outcomes.len() - self.cancelled()
    }

    /// Folds another report into this one (used by multi-job imports).
    pub fn merge(&mut self, other: ExecutionReport) {
        self.outcomes.extend(other.outcomes);
        self.skipped += other.skipped;
        self.retried += other.retried;
        self.interrupted |= other.interrupted;
    }

    fn count(&self, predicate: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(o)).count()
    }
}
