//! Local/remote playlist reconciliation.
//!
//! [`reconcile`] compares a [`RemoteManifest`] with the local inventory and
//! produces a [`ReconciliationPlan`]: which tracks to fetch, which are already
//! satisfied locally, and which local files are orphans to delete. It performs
//! no I/O and is deterministic for fixed inputs, so repeated runs against an
//! unchanged remote/local pair converge to a no-op.
//!
//! # Example
//!
//! ```
//! use playlist_core::reconcile::{ReconcilePolicy, reconcile};
//! use playlist_core::{LocalFile, RemoteManifest, Track, TrackId};
//!
//! let id = |s: &str| TrackId::new(s).unwrap();
//! let remote = RemoteManifest::new(
//!     "PL1",
//!     "Mix",
//!     vec![Track::new(id("A"), "a", 0), Track::new(id("B"), "b", 1)],
//! );
//! let local = vec![
//!     LocalFile::new("a [A].mp3", id("A")),
//!     LocalFile::new("d [D].mp3", id("D")),
//! ];
//!
//! let outcome = reconcile(&remote, &local, ReconcilePolicy::mirror());
//! assert_eq!(outcome.plan.to_fetch.len(), 1);
//! assert_eq!(outcome.plan.to_skip.len(), 1);
//! assert_eq!(outcome.plan.to_delete.len(), 1);
//! ```

mod plan;

pub use plan::{PlanSummary, ReconciliationPlan};

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::model::{LocalFile, RemoteManifest, TrackId};

/// Policy flags controlling a reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcilePolicy {
    /// Delete local files whose identity is no longer in the manifest.
    pub delete_orphans: bool,
    /// Skip tracks already present locally instead of fetching them again.
    pub skip_existing: bool,
}

impl ReconcilePolicy {
    /// Full mirror: skip what exists, delete what is gone (`mettre-a-jour`).
    #[must_use]
    pub fn mirror() -> Self {
        Self {
            delete_orphans: true,
            skip_existing: true,
        }
    }

    /// Additive download; `green` skips tracks already present.
    #[must_use]
    pub fn download(green: bool) -> Self {
        Self {
            delete_orphans: false,
            skip_existing: green,
        }
    }
}

/// Two or more local files recover the same identity.
///
/// Recoverable: the first file in path order is treated as canonical and the
/// conflict is surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "duplicate local identity {id}: {} also found at {}",
    .canonical.display(),
    display_paths(.duplicates)
)]
pub struct DuplicateLocalIdentity {
    /// Identity shared by the files.
    pub id: TrackId,
    /// File treated as canonical.
    pub canonical: PathBuf,
    /// Other files carrying the same identity.
    pub duplicates: Vec<PathBuf>,
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result of a reconciliation: the plan plus any identity conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconcileOutcome {
    /// Actions needed to align local state with the manifest.
    pub plan: ReconciliationPlan,
    /// Local identity collisions, ordered by identity.
    pub conflicts: Vec<DuplicateLocalIdentity>,
}

impl ReconcileOutcome {
    /// Whether any identity collision was found.
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Computes the reconciliation plan for a manifest and a local inventory.
///
/// Local files are considered in path order, so "first seen" is stable
/// regardless of how the inventory was collected. Tracks appear in manifest
/// order; a manifest listing the same identity twice contributes it once.
#[must_use]
pub fn reconcile(
    remote: &RemoteManifest,
    local: &[LocalFile],
    policy: ReconcilePolicy,
) -> ReconcileOutcome {
    let mut ordered: Vec<&LocalFile> = local.iter().collect();
    ordered.sort_by(|a, b| a.path.cmp(&b.path));

    let (index, conflicts) = build_identity_index(&ordered);
    for conflict in &conflicts {
        warn!(
            id = %conflict.id,
            canonical = %conflict.canonical.display(),
            duplicates = conflict.duplicates.len(),
            "duplicate local identity; keeping first file as canonical"
        );
    }

    let mut plan = ReconciliationPlan::default();
    let mut seen: HashSet<&TrackId> = HashSet::new();
    for track in &remote.tracks {
        if !seen.insert(&track.id) {
            debug!(id = %track.id, position = track.position, "ignoring repeated manifest entry");
            continue;
        }
        if policy.skip_existing && index.contains_key(&track.id) {
            plan.to_skip.push(track.clone());
        } else {
            plan.to_fetch.push(track.clone());
        }
    }

    // Private/deleted entries are still listed; their local copies are not orphans.
    seen.extend(&remote.unavailable);

    if policy.delete_orphans {
        plan.to_delete = ordered
            .iter()
            .filter(|file| !seen.contains(&file.id))
            .map(|file| (*file).clone())
            .collect();
    }

    debug!(
        remote = remote.len(),
        local = local.len(),
        fetch = plan.to_fetch.len(),
        skip = plan.to_skip.len(),
        delete = plan.to_delete.len(),
        conflicts = conflicts.len(),
        "reconciliation complete"
    );

    ReconcileOutcome { plan, conflicts }
}

fn build_identity_index<'a>(
    ordered: &[&'a LocalFile],
) -> (HashMap<&'a TrackId, &'a LocalFile>, Vec<DuplicateLocalIdentity>) {
    let mut index: HashMap<&TrackId, &LocalFile> = HashMap::new();
    let mut duplicates: HashMap<&TrackId, Vec<PathBuf>> = HashMap::new();

    for &file in ordered {
        if index.contains_key(&file.id) {
            duplicates.entry(&file.id).or_default().push(file.path.clone());
        } else {
            index.insert(&file.id, file);
        }
    }

    let mut conflicts: Vec<DuplicateLocalIdentity> = duplicates
        .into_iter()
        .filter_map(|(id, duplicates)| {
            let canonical = index.get(id)?;
            Some(DuplicateLocalIdentity {
                id: id.clone(),
                canonical: canonical.path.clone(),
                duplicates,
            })
        })
        .collect();
    conflicts.sort_by(|a, b| a.id.cmp(&b.id));

    (index, conflicts)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Track;

    fn id(value: &str) -> TrackId {
        TrackId::new(value).unwrap()
    }

    fn manifest(ids: &[&str]) -> RemoteManifest {
        let tracks = ids
            .iter()
            .enumerate()
            .map(|(position, value)| Track::new(id(value), format!("Title {value}"), position))
            .collect();
        RemoteManifest::new("PL", "Playlist", tracks)
    }

    fn local(entries: &[(&str, &str)]) -> Vec<LocalFile> {
        entries
            .iter()
            .map(|(path, value)| LocalFile::new(*path, id(value)))
            .collect()
    }

    fn ids_of(tracks: &[Track]) -> Vec<&str> {
        tracks.iter().map(|track| track.id.as_str()).collect()
    }

    #[test]
    fn test_reconcile_mirror_example() {
        let remote = manifest(&["A", "B", "C"]);
        let files = local(&[("a [A].mp3", "A"), ("d [D].mp3", "D")]);

        let outcome = reconcile(&remote, &files, ReconcilePolicy::mirror());

        assert_eq!(ids_of(&outcome.plan.to_fetch), ["B", "C"]);
        assert_eq!(ids_of(&outcome.plan.to_skip), ["A"]);
        assert_eq!(outcome.plan.to_delete.len(), 1);
        assert_eq!(outcome.plan.to_delete[0].id.as_str(), "D");
        assert!(outcome.conflicts.is_empty());
    }

    #[test]
    fn test_reconcile_empty_remote_deletes_everything() {
        let remote = manifest(&[]);
        let files = local(&[("b [B].mp3", "B"), ("a [A].mp3", "A")]);

        let outcome = reconcile(&remote, &files, ReconcilePolicy::mirror());

        assert!(outcome.plan.to_fetch.is_empty());
        let deleted: Vec<&str> = outcome.plan.to_delete.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(deleted, ["A", "B"], "deletions follow path order");
    }

    #[test]
    fn test_reconcile_empty_local_fetches_whole_manifest() {
        let remote = manifest(&["A", "B"]);
        let outcome = reconcile(&remote, &[], ReconcilePolicy::mirror());
        assert_eq!(ids_of(&outcome.plan.to_fetch), ["A", "B"]);
        assert!(outcome.plan.to_skip.is_empty());
        assert!(outcome.plan.to_delete.is_empty());
    }

    #[test]
    fn test_reconcile_without_skip_existing_fetches_present_tracks() {
        let remote = manifest(&["A", "B"]);
        let files = local(&[("a [A].mp3", "A")]);
        let outcome = reconcile(&remote, &files, ReconcilePolicy::download(false));
        assert_eq!(ids_of(&outcome.plan.to_fetch), ["A", "B"]);
        assert!(outcome.plan.to_skip.is_empty());
    }

    #[test]
    fn test_reconcile_never_deletes_when_delete_orphans_disabled() {
        let remote = manifest(&["A"]);
        let files = local(&[("x [X].mp3", "X"), ("y [Y].mp3", "Y")]);
        let outcome = reconcile(&remote, &files, ReconcilePolicy::download(true));
        assert!(outcome.plan.to_delete.is_empty());
    }

    #[test]
    fn test_reconcile_keeps_files_of_unavailable_entries() {
        let remote = manifest(&["A"]).with_unavailable(vec![id("P")]);
        let files = local(&[("a [A].mp3", "A"), ("loved [P].mp3", "P"), ("gone [G].mp3", "G")]);

        let outcome = reconcile(&remote, &files, ReconcilePolicy::mirror());

        assert!(outcome.plan.to_fetch.is_empty());
        assert_eq!(ids_of(&outcome.plan.to_skip), ["A"]);
        let deleted: Vec<&str> = outcome.plan.to_delete.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(deleted, ["G"]);
    }

    #[test]
    fn test_reconcile_never_fetches_unavailable_entries() {
        let remote = manifest(&[]).with_unavailable(vec![id("P")]);
        let outcome = reconcile(&remote, &[], ReconcilePolicy::download(false));
        assert!(outcome.plan.to_fetch.is_empty());
        assert!(outcome.plan.to_skip.is_empty());
    }

    #[test]
    fn test_reconcile_reports_duplicate_identity_and_continues() {
        let remote = manifest(&["A", "B", "C"]);
        let files = local(&[("z copy [A].mp3", "A"), ("a [A].mp3", "A"), ("b [B].mp3", "B")]);

        let outcome = reconcile(&remote, &files, ReconcilePolicy::mirror());

        assert_eq!(outcome.conflicts.len(), 1);
        let conflict = &outcome.conflicts[0];
        assert_eq!(conflict.id.as_str(), "A");
        assert_eq!(conflict.canonical, PathBuf::from("a [A].mp3"));
        assert_eq!(conflict.duplicates, vec![PathBuf::from("z copy [A].mp3")]);

        assert_eq!(ids_of(&outcome.plan.to_skip), ["A", "B"]);
        assert_eq!(ids_of(&outcome.plan.to_fetch), ["C"]);
        assert!(outcome.plan.to_delete.is_empty());
    }

    #[test]
    fn test_reconcile_orphan_duplicates_are_all_deleted() {
        let remote = manifest(&["A"]);
        let files = local(&[("d1 [D].mp3", "D"), ("d2 [D].mp3", "D")]);
        let outcome = reconcile(&remote, &files, ReconcilePolicy::mirror());
        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.plan.to_delete.len(), 2);
    }

    #[test]
    fn test_reconcile_collapses_repeated_manifest_entries() {
        let remote = manifest(&["A", "B", "A"]);
        let outcome = reconcile(&remote, &[], ReconcilePolicy::mirror());
        assert_eq!(ids_of(&outcome.plan.to_fetch), ["A", "B"]);
    }

    #[test]
    fn test_reconcile_is_deterministic_regardless_of_local_order() {
        let remote = manifest(&["A", "C"]);
        let forward = local(&[("a [A].mp3", "A"), ("b [B].mp3", "B"), ("b2 [B].mp3", "B")]);
        let mut backward = forward.clone();
        backward.reverse();

        let first = reconcile(&remote, &forward, ReconcilePolicy::mirror());
        let second = reconcile(&remote, &backward, ReconcilePolicy::mirror());
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_identity_error_message_names_paths() {
        let conflict = DuplicateLocalIdentity {
            id: id("A"),
            canonical: PathBuf::from("a [A].mp3"),
            duplicates: vec![PathBuf::from("b [A].mp3")],
        };
        let msg = conflict.to_string();
        assert!(msg.contains("duplicate local identity A"), "{msg}");
        assert!(msg.contains("a [A].mp3"), "{msg}");
        assert!(msg.contains("b [A].mp3"), "{msg}");
    }

    #[test]
    fn test_policy_constructors() {
        assert_eq!(
            ReconcilePolicy::mirror(),
            ReconcilePolicy {
                delete_orphans: true,
                skip_existing: true
            }
        );
        assert!(!ReconcilePolicy::download(true).delete_orphans);
        assert!(ReconcilePolicy::download(true).skip_existing);
        assert!(!ReconcilePolicy::download(false).skip_existing);
    }
}
