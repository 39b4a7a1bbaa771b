//! Domain model shared by the reconciler and its collaborators.
//!
//! All values here are transient snapshots: a [`RemoteManifest`] is fetched
//! once per run and the local directory itself is the only persisted state.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Base URL used to build canonical watch URLs for a track.
const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

/// Base URL used to build canonical playlist URLs.
const PLAYLIST_URL_BASE: &str = "https://www.youtube.com/playlist?list=";

/// Errors raised when constructing a [`TrackId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTrackId {
    /// The identity string was empty.
    #[error("track identity cannot be empty")]
    Empty,

    /// The identity contains characters outside `[A-Za-z0-9_-]`.
    #[error("track identity '{value}' contains characters outside [A-Za-z0-9_-]")]
    InvalidCharacters {
        /// The rejected value.
        value: String,
    },
}

/// Stable identity of a track, derived from the remote source (a video id).
///
/// Identity never depends on title text; two tracks are the same track if and
/// only if their ids are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackId(String);

impl TrackId {
    /// Creates a validated track identity.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTrackId`] when the value is empty or contains
    /// characters outside the video id alphabet.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidTrackId> {
        let value = value.into();
        if value.is_empty() {
            return Err(InvalidTrackId::Empty);
        }
        if !value.chars().all(is_identity_char) {
            return Err(InvalidTrackId::InvalidCharacters { value });
        }
        Ok(Self(value))
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub(crate) fn is_identity_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TrackId {
    type Error = InvalidTrackId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TrackId> for String {
    fn from(id: TrackId) -> Self {
        id.0
    }
}

/// One entry of a remote playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Stable identity.
    pub id: TrackId,
    /// Display title (used for file naming and logging only).
    pub title: String,
    /// Zero-based ordinal within the playlist.
    pub position: usize,
    /// Optional artist/grouping label used for foldering in bulk import.
    pub group: Option<String>,
}

impl Track {
    /// Creates an ungrouped track.
    #[must_use]
    pub fn new(id: TrackId, title: impl Into<String>, position: usize) -> Self {
        Self {
            id,
            title: title.into(),
            position,
            group: None,
        }
    }

    /// Returns a copy of this track carrying a grouping label.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Canonical watch URL handed to the fetcher.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{WATCH_URL_BASE}{}", self.id)
    }
}

/// Ordered snapshot of a playlist's tracks at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteManifest {
    /// Remote playlist id.
    pub playlist_id: String,
    /// Remote playlist title.
    pub title: String,
    /// Tracks in playlist order.
    pub tracks: Vec<Track>,
    /// Ids still listed in the playlist whose video is private or deleted.
    ///
    /// They count as present when looking for orphans but are never fetched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable: Vec<TrackId>,
}

impl RemoteManifest {
    /// Creates a manifest from tracks already in playlist order.
    #[must_use]
    pub fn new(playlist_id: impl Into<String>, title: impl Into<String>, tracks: Vec<Track>) -> Self {
        Self {
            playlist_id: playlist_id.into(),
            title: title.into(),
            tracks,
            unavailable: Vec::new(),
        }
    }

    /// Returns a copy of this manifest that also lists unavailable ids.
    #[must_use]
    pub fn with_unavailable(mut self, ids: Vec<TrackId>) -> Self {
        self.unavailable = ids;
        self
    }

    /// Returns the identity set of this manifest, unavailable entries included.
    #[must_use]
    pub fn identities(&self) -> HashSet<&TrackId> {
        self.tracks
            .iter()
            .map(|track| &track.id)
            .chain(&self.unavailable)
            .collect()
    }

    /// Number of tracks in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the snapshot has no tracks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Canonical share URL of the playlist.
    #[must_use]
    pub fn url(&self) -> String {
        playlist_url(&self.playlist_id)
    }
}

/// Builds the canonical share URL for a playlist id.
#[must_use]
pub fn playlist_url(playlist_id: &str) -> String {
    format!("{PLAYLIST_URL_BASE}{playlist_id}")
}

/// Titles YouTube substitutes for entries that can no longer be played.
const PLACEHOLDER_TITLES: [&str; 2] = ["private video", "deleted video"];

/// Whether a listed entry is a private/deleted placeholder rather than a
/// playable track.
#[must_use]
pub fn is_unavailable_placeholder(title: &str) -> bool {
    let normalized = title
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_ascii_lowercase();
    PLACEHOLDER_TITLES.contains(&normalized.as_str())
}

/// A file in the local directory whose identity could be recovered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalFile {
    /// Location on disk.
    pub path: PathBuf,
    /// Identity recovered from the file name.
    pub id: TrackId,
}

impl LocalFile {
    /// Creates a local file record.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, id: TrackId) -> Self {
        Self {
            path: path.into(),
            id,
        }
    }

    /// File name for display, falling back to the full path.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }

    /// Location on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
