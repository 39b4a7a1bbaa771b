//! Fetching remote tracks into local files.
//!
//! - [`Fetcher`] - async trait; one call materializes one track
//! - [`YtDlpFetcher`] - `yt-dlp` audio extraction with atomic rename
//! - [`RetryPolicy`] / [`classify_error`] - backoff for transient failures

mod error;
mod retry;
mod ytdlp;

pub use error::FetchError;
pub use retry::{DEFAULT_MAX_RETRIES, FailureType, RetryDecision, RetryPolicy, classify_error};
pub use ytdlp::YtDlpFetcher;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::model::Track;

/// Materializes a remote track as a local file.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `track` into the `destination` directory and returns the
    /// final file path, whose name encodes the track identity.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the track cannot be fetched; no partial
    /// file is left under a recognizable name.
    async fn fetch(&self, track: &Track, destination: &Path) -> Result<PathBuf, FetchError>;
}
