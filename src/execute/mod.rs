//! Concurrent application of a reconciliation plan.
//!
//! Fetches run as Tokio tasks bounded by a semaphore; each retries
//! transient failures per the [`RetryPolicy`]. Deletions run sequentially
//! after every fetch has finished. An interrupt flag stops scheduling new
//! work while in-flight fetches complete.
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use playlist_core::delete::FsDeleter;
//! use playlist_core::execute::PlanExecutor;
//! use playlist_core::fetch::{RetryPolicy, YtDlpFetcher};
//! use playlist_core::reconcile::ReconciliationPlan;
//!
//! # async fn example(plan: ReconciliationPlan) -> Result<(), Box<dyn std::error::Error>> {
//! let executor = PlanExecutor::new(
//!     Arc::new(YtDlpFetcher::default()),
//!     Arc::new(FsDeleter),
//!     4,
//!     RetryPolicy::default(),
//! )?;
//! let report = executor.execute(&plan, Path::new("./music")).await?;
//! println!("fetched {}, failed {}", report.fetched(), report.failure_count());
//! # Ok(())
//! # }
//! ```

mod report;
mod stats;

pub use report::{ExecutionReport, ItemOutcome};
pub use stats::ExecutionStats;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use crate::delete::Deleter;
use crate::fetch::{FetchError, Fetcher, RetryDecision, RetryPolicy, classify_error};
use crate::model::Track;
use crate::reconcile::ReconciliationPlan;

/// Minimum allowed concurrency.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency.
pub const MAX_CONCURRENCY: usize = 16;

/// Default number of parallel fetches.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Errors that abort plan execution as a whole.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// Concurrency outside the supported range.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// Rejected value.
        value: usize,
    },

    /// The semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// Applies plans with a fetcher and a deleter.
pub struct PlanExecutor {
    fetcher: Arc<dyn Fetcher>,
    deleter: Arc<dyn Deleter>,
    semaphore: Arc<Semaphore>,
    concurrency: usize,
    retry_policy: RetryPolicy,
    stats: Arc<ExecutionStats>,
    interrupted: Arc<AtomicBool>,
}

impl std::fmt::Debug for PlanExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanExecutor")
            .field("concurrency", &self.concurrency)
            .field("retry_policy", &self.retry_policy)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl PlanExecutor {
    /// Creates an executor.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError::InvalidConcurrency`] when `concurrency` is
    /// outside `1..=16`.
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        deleter: Arc<dyn Deleter>,
        concurrency: usize,
        retry_policy: RetryPolicy,
    ) -> Result<Self, ExecuteError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(ExecuteError::InvalidConcurrency { value: concurrency });
        }
        debug!(
            concurrency,
            max_attempts = retry_policy.max_attempts(),
            "creating plan executor"
        );
        Ok(Self {
            fetcher,
            deleter,
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            retry_policy,
            stats: Arc::new(ExecutionStats::new()),
            interrupted: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Shares an interrupt flag (set from a Ctrl-C handler).
    #[must_use]
    pub fn with_interrupt_flag(mut self, interrupted: Arc<AtomicBool>) -> Self {
        self.interrupted = interrupted;
        self
    }

    /// Configured concurrency.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Live counters, shared with progress displays.
    #[must_use]
    pub fn stats(&self) -> Arc<ExecutionStats> {
        Arc::clone(&self.stats)
    }

    /// Whether the interrupt flag has been raised.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    /// Applies `plan`, fetching into `destination`.
    ///
    /// Individual item failures never make this method fail; they are
    /// recorded in the report.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError::SemaphoreClosed`] if the semaphore closes.
    #[instrument(skip(self, plan), fields(destination = %destination.display(), summary = %plan.summary()))]
    pub async fn execute(
        &self,
        plan: &ReconciliationPlan,
        destination: &Path,
    ) -> Result<ExecutionReport, ExecuteError> {
        let retried_before = self.stats.retried();
        let mut report = ExecutionReport {
            skipped: plan.to_skip.len(),
            ..ExecutionReport::default()
        };

        let mut handles = Vec::with_capacity(plan.to_fetch.len());
        let mut pending = plan.to_fetch.iter();
        for track in pending.by_ref() {
            if self.is_interrupted() {
                report.outcomes.push(ItemOutcome::Cancelled {
                    track: track.clone(),
                });
                break;
            }

            let permit = Arc::clone(&self.semaphore)
                .acquire_owned()
                .await
                .map_err(|_| ExecuteError::SemaphoreClosed)?;

            if self.is_interrupted() {
                drop(permit);
                report.outcomes.push(ItemOutcome::Cancelled {
                    track: track.clone(),
                });
                break;
            }

            let fetcher = Arc::clone(&self.fetcher);
            let stats = Arc::clone(&self.stats);
            let interrupted = Arc::clone(&self.interrupted);
            let policy = self.retry_policy.clone();
            let task_track = track.clone();
            let destination = destination.to_path_buf();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                fetch_with_retry(
                    fetcher.as_ref(),
                    &task_track,
                    &destination,
                    &policy,
                    &stats,
                    &interrupted,
                )
                .await
            });
            handles.push((track.clone(), handle));
        }

        // Remaining tracks after an interrupt are recorded as cancelled.
        let cancelled: Vec<ItemOutcome> = pending
            .map(|track| ItemOutcome::Cancelled {
                track: track.clone(),
            })
            .collect();

        let mut fetched_outcomes = Vec::with_capacity(handles.len());
        for (track, handle) in handles {
            let outcome = match handle.await {
                Ok((Ok(path), attempts)) => {
                    self.stats.increment_fetched();
                    ItemOutcome::Fetched {
                        track,
                        path,
                        attempts,
                    }
                }
                Ok((Err(error), attempts)) => {
                    warn!(id = %track.id, title = %track.title, error = %error, attempts, "fetch failed");
                    self.stats.increment_failed();
                    ItemOutcome::FetchFailed {
                        track,
                        error,
                        attempts,
                    }
                }
                Err(join_error) => {
                    warn!(id = %track.id, error = %join_error, "fetch task panicked");
                    self.stats.increment_failed();
                    let error = FetchError::Failed {
                        id: track.id.clone(),
                        reason: format!("fetch task aborted: {join_error}"),
                    };
                    ItemOutcome::FetchFailed {
                        track,
                        error,
                        attempts: 0,
                    }
                }
            };
            fetched_outcomes.push(outcome);
        }

        // Keep plan order: started fetches first, then the cancelled ones.
        let mut ordered = fetched_outcomes;
        ordered.append(&mut report.outcomes);
        ordered.extend(cancelled);
        report.outcomes = ordered;

        if self.is_interrupted() {
            report.interrupted = true;
            if !plan.to_delete.is_empty() {
                info!(
                    pending = plan.to_delete.len(),
                    "interrupted, deletions not started"
                );
            }
        } else {
            for file in &plan.to_delete {
                if self.is_interrupted() {
                    report.interrupted = true;
                    break;
                }
                match self.deleter.delete(&file.path).await {
                    Ok(()) => {
                        self.stats.increment_deleted();
                        report.outcomes.push(ItemOutcome::Deleted { file: file.clone() });
                    }
                    Err(error) => {
                        warn!(path = %file.path.display(), error = %error, "delete failed");
                        self.stats.increment_failed();
                        report.outcomes.push(ItemOutcome::DeleteFailed {
                            file: file.clone(),
                            error,
                        });
                    }
                }
            }
        }

        report.retried = self.stats.retried() - retried_before;
        info!(
            fetched = report.fetched(),
            failed = report.failure_count(),
            deleted = report.deleted(),
            skipped = report.skipped,
            retried = report.retried,
            interrupted = report.interrupted,
            "plan executed"
        );
        Ok(report)
    }
}

/// Fetches one track, retrying transient failures.
///
/// Returns the result together with the number of attempts made.
#[instrument(skip_all, fields(id = %track.id))]
async fn fetch_with_retry(
    fetcher: &dyn Fetcher,
    track: &Track,
    destination: &Path,
    policy: &RetryPolicy,
    stats: &ExecutionStats,
    interrupted: &AtomicBool,
) -> (Result<PathBuf, FetchError>, u32) {
    let mut attempt = 0_u32;
    loop {
        attempt += 1;
        debug!(attempt, "fetching");
        let error = match fetcher.fetch(track, destination).await {
            Ok(path) => return (Ok(path), attempt),
            Err(error) => error,
        };

        if interrupted.load(Ordering::SeqCst) {
            return (Err(error), attempt);
        }

        match policy.should_retry(classify_error(&error), attempt) {
            RetryDecision::Retry {
                delay,
                attempt: next_attempt,
            } => {
                info!(
                    title = %track.title,
                    attempt = next_attempt,
                    max_attempts = policy.max_attempts(),
                    delay_ms = delay.as_millis(),
                    error = %error,
                    "retrying fetch"
                );
                stats.increment_retried();
                tokio::time::sleep(delay).await;
            }
            RetryDecision::DoNotRetry { reason } => {
                debug!(%reason, "not retrying fetch");
                return (Err(error), attempt);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::delete::FsDeleter;
    use crate::fetch::YtDlpFetcher;

    fn executor(concurrency: usize) -> Result<PlanExecutor, ExecuteError> {
        PlanExecutor::new(
            Arc::new(YtDlpFetcher::default()),
            Arc::new(FsDeleter),
            concurrency,
            RetryPolicy::immediate(1),
        )
    }

    #[test]
    fn test_concurrency_bounds() {
        assert_eq!(executor(1).unwrap().concurrency(), 1);
        assert_eq!(executor(DEFAULT_CONCURRENCY).unwrap().concurrency(), 4);
        assert_eq!(executor(16).unwrap().concurrency(), 16);
        assert!(matches!(
            executor(0),
            Err(ExecuteError::InvalidConcurrency { value: 0 })
        ));
        assert!(matches!(
            executor(17),
            Err(ExecuteError::InvalidConcurrency { value: 17 })
        ));
    }

    #[test]
    fn test_error_display_names_range() {
        let msg = ExecuteError::InvalidConcurrency { value: 99 }.to_string();
        assert!(msg.contains("99") && msg.contains("1") && msg.contains("16"), "{msg}");
    }

    #[tokio::test]
    async fn test_empty_plan_is_noop() {
        let dir = tempfile::TempDir::new().unwrap();
        let report = executor(2)
            .unwrap()
            .execute(&ReconciliationPlan::default(), dir.path())
            .await
            .unwrap();
        assert!(report.outcomes.is_empty());
        assert!(!report.interrupted);
    }
}
