//! Playlist synchronization: source, scanner, reconciler, executor.
//!
//! Listing failures and unreadable directories abort the run before any
//! local change; per-track failures are collected in the execution report.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::execute::{ExecuteError, ExecutionReport, PlanExecutor};
use crate::inventory::{self, ScanError};
use crate::model::RemoteManifest;
use crate::reconcile::{DuplicateLocalIdentity, ReconcilePolicy, ReconciliationPlan, reconcile};
use crate::source::{PlaylistRef, PlaylistSource, SourceError};

/// Errors that stop a synchronization before or during execution.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote playlist could not be listed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The destination directory could not be scanned.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The executor failed as a whole.
    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

/// Result of reconciling one playlist against one directory.
#[derive(Debug)]
pub struct PreparedSync {
    /// Remote snapshot.
    pub manifest: RemoteManifest,
    /// Local files carrying a track identity.
    pub local_tracks: usize,
    /// Actions to apply.
    pub plan: ReconciliationPlan,
    /// Duplicate local identities found while indexing.
    pub conflicts: Vec<DuplicateLocalIdentity>,
    /// Local files without an encoded identity; never touched.
    pub unrecognized: Vec<PathBuf>,
}

/// Outcome of a full synchronization.
#[derive(Debug)]
pub struct SyncReport {
    /// What was planned.
    pub prepared: PreparedSync,
    /// What happened; `None` for dry runs.
    pub execution: Option<ExecutionReport>,
}

/// Lists the playlist, scans `destination`, and reconciles the two.
///
/// With `delete_orphans` the destination must already exist, since the
/// plan may delete from it; otherwise a missing destination counts as empty.
///
/// # Errors
///
/// Returns [`SyncError::Source`] when the playlist cannot be listed and
/// [`SyncError::Scan`] when the destination cannot be read.
#[instrument(skip(source, playlist), fields(source = source.name(), playlist = %playlist, destination = %destination.display()))]
pub async fn prepare(
    source: &dyn PlaylistSource,
    playlist: &PlaylistRef,
    destination: &Path,
    policy: ReconcilePolicy,
) -> Result<PreparedSync, SyncError> {
    let manifest = source.fetch_manifest(playlist).await?;

    let local = if policy.delete_orphans {
        inventory::scan(destination)?
    } else {
        inventory::scan_or_empty(destination)?
    };
    if !local.unrecognized.is_empty() {
        info!(
            count = local.unrecognized.len(),
            "ignoring files without an encoded track identity"
        );
    }

    let outcome = reconcile(&manifest, &local.files, policy);
    for conflict in &outcome.conflicts {
        warn!(conflict = %conflict, "duplicate local identity");
    }
    info!(summary = %outcome.plan.summary(), "reconciled");

    Ok(PreparedSync {
        manifest,
        local_tracks: local.files.len(),
        plan: outcome.plan,
        conflicts: outcome.conflicts,
        unrecognized: local.unrecognized,
    })
}

/// Prepares and, unless `dry_run`, applies a synchronization.
///
/// # Errors
///
/// Returns [`SyncError`] for fatal failures; per-item failures are in the
/// report.
pub async fn sync_playlist(
    source: &dyn PlaylistSource,
    executor: &PlanExecutor,
    playlist: &PlaylistRef,
    destination: &Path,
    policy: ReconcilePolicy,
    dry_run: bool,
) -> Result<SyncReport, SyncError> {
    let prepared = prepare(source, playlist, destination, policy).await?;
    if dry_run {
        info!("dry run, no changes applied");
        return Ok(SyncReport {
            prepared,
            execution: None,
        });
    }
    let execution = executor.execute(&prepared.plan, destination).await?;
    Ok(SyncReport {
        prepared,
        execution: Some(execution),
    })
}
