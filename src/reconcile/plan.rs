//! The reconciliation plan and its summary.

use std::fmt;

use crate::model::{LocalFile, Track};

/// Actions needed to align a local directory with a remote manifest.
///
/// Every manifest identity is in exactly one of `to_fetch` / `to_skip`.
/// `to_delete` only holds files whose identity is absent from the manifest,
/// and only when orphan deletion was requested.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconciliationPlan {
    /// Tracks to download, in manifest order.
    pub to_fetch: Vec<Track>,
    /// Tracks already satisfied locally, in manifest order.
    pub to_skip: Vec<Track>,
    /// Orphaned local files, in path order.
    pub to_delete: Vec<LocalFile>,
}

impl ReconciliationPlan {
    /// True when applying the plan would change nothing on disk.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.to_fetch.is_empty() && self.to_delete.is_empty()
    }

    /// Number of actions (fetches and deletions) the plan will execute.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.to_fetch.len() + self.to_delete.len()
    }

    /// Counts per action kind.
    #[must_use]
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            fetch: self.to_fetch.len(),
            skip: self.to_skip.len(),
            delete: self.to_delete.len(),
        }
    }
}

/// Counts of a plan's actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanSummary {
    /// Tracks to download.
    pub fetch: usize,
    /// Tracks already present.
    pub skip: usize,
    /// Files to delete.
    pub delete: usize,
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to fetch, {} to skip, {} to delete",
            self.fetch, self.skip, self.delete
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::TrackId;

    #[test]
    fn test_empty_plan_is_noop() {
        let plan = ReconciliationPlan::default();
        assert!(plan.is_noop());
        assert_eq!(plan.action_count(), 0);
    }

    #[test]
    fn test_plan_with_only_skips_is_noop() {
        let plan = ReconciliationPlan {
            to_skip: vec![Track::new(TrackId::new("a").unwrap(), "A", 0)],
            ..ReconciliationPlan::default()
        };
        assert!(plan.is_noop());
        assert_eq!(plan.summary().skip, 1);
    }

    #[test]
    fn test_plan_summary_display() {
        let plan = ReconciliationPlan {
            to_fetch: vec![Track::new(TrackId::new("a").unwrap(), "A", 0)],
            to_skip: Vec::new(),
            to_delete: vec![LocalFile::new("x [x].mp3", TrackId::new("x").unwrap())],
        };
        assert!(!plan.is_noop());
        assert_eq!(plan.action_count(), 2);
        assert_eq!(plan.summary().to_string(), "1 to fetch, 0 to skip, 1 to delete");
    }
}
