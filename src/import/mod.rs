//! Bulk import of playlists and single tracks grouped by artist.
//!
//! Sources come from an optional YAML declaration (see [`declaration`]) and
//! from `--playlist` / `--tune` command-line values. Every declared artist
//! becomes a group label and, unless the import is flat, its own
//! subdirectory. Each job is reconciled against its own directory and never
//! deletes anything.

pub mod declaration;
mod error;

pub use declaration::{ArtistEntry, ImportDeclaration};
pub use error::{ImportError, JobError};

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::execute::{ExecutionReport, PlanExecutor};
use crate::inventory;
use crate::layout;
use crate::model::RemoteManifest;
use crate::reconcile::{PlanSummary, ReconcilePolicy, ReconciliationPlan, reconcile};
use crate::source::{PlaylistRef, PlaylistSource};

/// Label used in reports for artist entries without a name.
pub const UNNAMED_ARTIST: &str = "Unknown";

/// What a job downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobKind {
    /// A whole playlist.
    Playlist(PlaylistRef),
    /// One track URL.
    Tune(String),
}

/// One unit of import work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportJob {
    /// Playlist or single track.
    pub kind: JobKind,
    /// Artist label; `None` for command-line sources.
    pub group: Option<String>,
}

impl ImportJob {
    /// Playlist job.
    #[must_use]
    pub fn playlist(playlist: PlaylistRef, group: Option<String>) -> Self {
        Self {
            kind: JobKind::Playlist(playlist),
            group,
        }
    }

    /// Single-track job.
    #[must_use]
    pub fn tune(url: impl Into<String>, group: Option<String>) -> Self {
        Self {
            kind: JobKind::Tune(url.into()),
            group,
        }
    }
}

impl fmt::Display for ImportJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            JobKind::Playlist(playlist) => write!(f, "{}", playlist.url()),
            JobKind::Tune(url) => f.write_str(url),
        }
    }
}

/// Raw import inputs as given by the user.
#[derive(Debug, Clone, Default)]
pub struct ImportSources {
    /// Parsed declaration file, if one was given.
    pub declaration: Option<ImportDeclaration>,
    /// `--playlist` values.
    pub playlists: Vec<String>,
    /// `--tune` values.
    pub tunes: Vec<String>,
}

/// Ordered jobs plus the declaration entries that were ignored.
#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    /// Jobs in run order: declared artists first, then command-line sources.
    pub jobs: Vec<ImportJob>,
    /// Names of incomplete artist entries.
    pub ignored_artists: Vec<String>,
}

impl ImportSources {
    /// Turns the inputs into jobs.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::NoSources`] when there is neither a declaration
    /// nor a command-line source, and [`ImportError::InvalidPlaylist`] for
    /// a playlist entry that is not a playlist reference.
    pub fn into_plan(self) -> Result<ImportPlan, ImportError> {
        if self.declaration.is_none() && self.playlists.is_empty() && self.tunes.is_empty() {
            return Err(ImportError::NoSources);
        }

        let mut plan = ImportPlan::default();
        for artist in self.declaration.map(|d| d.artists).unwrap_or_default() {
            let Some(label) = artist.label().filter(|_| artist.is_complete()) else {
                let name = artist.label().unwrap_or(UNNAMED_ARTIST).to_string();
                warn!(artist = %name, "ignoring incomplete artist entry");
                plan.ignored_artists.push(name);
                continue;
            };
            let label = label.to_string();
            for playlist in &artist.playlists {
                let playlist = PlaylistRef::parse(playlist).map_err(ImportError::InvalidPlaylist)?;
                plan.jobs
                    .push(ImportJob::playlist(playlist, Some(label.clone())));
            }
            for tune in artist.tunes {
                plan.jobs.push(ImportJob::tune(tune, Some(label.clone())));
            }
        }

        for playlist in &self.playlists {
            let playlist = PlaylistRef::parse(playlist).map_err(ImportError::InvalidPlaylist)?;
            plan.jobs.push(ImportJob::playlist(playlist, None));
        }
        plan.jobs
            .extend(self.tunes.into_iter().map(|tune| ImportJob::tune(tune, None)));

        Ok(plan)
    }
}

/// Where and how jobs are written.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Base output directory.
    pub base_dir: PathBuf,
    /// Write every track into `base_dir` instead of per-artist folders.
    pub flat: bool,
    /// Skip tracks already present locally.
    pub green: bool,
}

/// A job that ran.
#[derive(Debug)]
pub struct CompletedJob {
    /// The job.
    pub job: ImportJob,
    /// Directory it was reconciled against.
    pub directory: PathBuf,
    /// Planned action counts.
    pub summary: PlanSummary,
}

/// A job that was abandoned before execution.
#[derive(Debug)]
pub struct FailedJob {
    /// The job.
    pub job: ImportJob,
    /// Why it was abandoned.
    pub error: JobError,
}

/// Result of a bulk import.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Jobs that were planned and executed.
    pub completed: Vec<CompletedJob>,
    /// Jobs abandoned before execution.
    pub failed: Vec<FailedJob>,
    /// Jobs not started because of an interrupt.
    pub not_started: usize,
    /// Merged per-item results of all executed jobs.
    pub execution: ExecutionReport,
}

impl ImportReport {
    /// Failed jobs plus failed items.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failed.len() + self.execution.failure_count()
    }

    /// Whether nothing was attempted and something failed.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.failure_count() > 0
            && self.execution.fetched() == 0
            && self.execution.skipped == 0
            && self.execution.deleted() == 0
    }
}

struct PreparedJob {
    directory: PathBuf,
    plan: ReconciliationPlan,
}

/// Runs every job in order with one executor.
///
/// `on_job` is called as each job starts. A job whose label, listing, or
/// directory scan fails is recorded and skipped; an interrupt stops before
/// the next job.
///
/// # Errors
///
/// Returns [`ImportError::Execute`] when the executor fails as a whole.
#[instrument(skip_all, fields(jobs = plan.jobs.len(), base_dir = %options.base_dir.display(), flat = options.flat))]
pub async fn run_import<F>(
    source: &dyn PlaylistSource,
    executor: &PlanExecutor,
    plan: &ImportPlan,
    options: &ImportOptions,
    mut on_job: F,
) -> Result<ImportReport, ImportError>
where
    F: FnMut(&ImportJob),
{
    let mut report = ImportReport::default();
    let policy = ReconcilePolicy::download(options.green);

    for (index, job) in plan.jobs.iter().enumerate() {
        if executor.is_interrupted() {
            report.not_started = plan.jobs.len() - index;
            report.execution.interrupted = true;
            break;
        }

        info!(job = %job, group = job.group.as_deref().unwrap_or("-"), "processing import job");
        on_job(job);
        let prepared = match prepare_job(source, job, options, policy).await {
            Ok(prepared) => prepared,
            Err(error) => {
                warn!(job = %job, error = %error, "import job abandoned");
                report.failed.push(FailedJob {
                    job: job.clone(),
                    error,
                });
                continue;
            }
        };

        let execution = executor
            .execute(&prepared.plan, &prepared.directory)
            .await?;
        report.execution.merge(execution);
        report.completed.push(CompletedJob {
            job: job.clone(),
            directory: prepared.directory,
            summary: prepared.plan.summary(),
        });
    }

    Ok(report)
}

async fn prepare_job(
    source: &dyn PlaylistSource,
    job: &ImportJob,
    options: &ImportOptions,
    policy: ReconcilePolicy,
) -> Result<PreparedJob, JobError> {
    let directory = layout::group_directory(&options.base_dir, job.group.as_deref(), options.flat)?;
    let manifest = fetch_job_manifest(source, job).await?;
    let local = inventory::scan_or_empty(&directory)?;

    let outcome = reconcile(&manifest, &local.files, policy);
    for conflict in &outcome.conflicts {
        warn!(conflict = %conflict, "duplicate local identity");
    }
    for track in &outcome.plan.to_fetch {
        let path =
            layout::resolve_destination(track, job.group.as_deref(), &options.base_dir, options.flat)?;
        debug!(id = %track.id, path = %path.display(), "destination resolved");
    }
    Ok(PreparedJob {
        directory,
        plan: outcome.plan,
    })
}

async fn fetch_job_manifest(
    source: &dyn PlaylistSource,
    job: &ImportJob,
) -> Result<RemoteManifest, JobError> {
    let mut manifest = match &job.kind {
        JobKind::Playlist(playlist) => source.fetch_manifest(playlist).await?,
        JobKind::Tune(url) => {
            let track = source.fetch_track(url).await?;
            let id = track.id.to_string();
            let title = track.title.clone();
            RemoteManifest::new(id, title, vec![track])
        }
    };
    if let Some(group) = &job.group {
        for track in &mut manifest.tracks {
            track.group = Some(group.clone());
        }
    }
    Ok(manifest)
}

/// Convenience wrapper: loads an optional declaration and builds the plan.
///
/// # Errors
///
/// See [`ImportDeclaration::load`] and [`ImportSources::into_plan`].
pub async fn plan_import(
    file: Option<&Path>,
    playlists: Vec<String>,
    tunes: Vec<String>,
) -> Result<ImportPlan, ImportError> {
    let declaration = match file {
        Some(path) => Some(ImportDeclaration::load(path).await?),
        None => None,
    };
    ImportSources {
        declaration,
        playlists,
        tunes,
    }
    .into_plan()
}
