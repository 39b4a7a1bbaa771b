//! Fetch error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::TrackId;
use crate::ytdlp::FailureKind;

/// Errors from fetching a single track.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The video is gone, private, or blocked.
    #[error("track {id} is unavailable: {reason}")]
    Unavailable {
        /// Track identity.
        id: TrackId,
        /// Last error line from the fetcher.
        reason: String,
    },

    /// Network failure; may succeed on retry.
    #[error("network error fetching {id}: {reason}")]
    Network {
        /// Track identity.
        id: TrackId,
        /// Last error line from the fetcher.
        reason: String,
    },

    /// The remote is throttling requests.
    #[error("rate limited while fetching {id}: {reason}")]
    RateLimited {
        /// Track identity.
        id: TrackId,
        /// Last error line from the fetcher.
        reason: String,
    },

    /// Audio extraction or conversion failed.
    #[error("post-processing failed for {id}: {reason}")]
    PostProcessing {
        /// Track identity.
        id: TrackId,
        /// Last error line from the fetcher.
        reason: String,
    },

    /// The fetcher failed for an unclassified reason.
    #[error("fetching {id} failed: {reason}")]
    Failed {
        /// Track identity.
        id: TrackId,
        /// Last error line from the fetcher.
        reason: String,
    },

    /// The external program could not be started.
    #[error("cannot run {program}: {source}\n  Suggestion: install yt-dlp and ffmpeg, or set ytdlp_path in the config file")]
    Spawn {
        /// Program path or name.
        program: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The program reported success but the expected output is missing.
    #[error("fetch of {id} produced no output at {path}")]
    MissingOutput {
        /// Track identity.
        id: TrackId,
        /// Expected output path.
        path: PathBuf,
    },

    /// Local file system error.
    #[error("IO error on {path}: {source}")]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The destination directory could not be resolved.
    #[error("cannot place {id}: {reason}")]
    Destination {
        /// Track identity.
        id: TrackId,
        /// Why the destination was rejected.
        reason: String,
    },
}

impl FetchError {
    /// Builds an error from a classified `yt-dlp` failure.
    #[must_use]
    pub fn from_kind(kind: FailureKind, id: &TrackId, reason: String) -> Self {
        let id = id.clone();
        match kind {
            FailureKind::Unavailable => Self::Unavailable { id, reason },
            FailureKind::Network => Self::Network { id, reason },
            FailureKind::RateLimited => Self::RateLimited { id, reason },
            FailureKind::PostProcessing => Self::PostProcessing { id, reason },
            FailureKind::Other => Self::Failed { id, reason },
        }
    }

    /// Creates an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
