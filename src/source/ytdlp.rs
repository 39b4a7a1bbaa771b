//! Playlist listing through `yt-dlp --flat-playlist`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{PlaylistRef, PlaylistSource, SourceError, parse_video_id};
use crate::model::{RemoteManifest, Track, TrackId, is_unavailable_placeholder};
use crate::ytdlp::{YtDlp, last_error_line};

#[derive(Debug, Deserialize)]
struct FlatPlaylist {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    entries: Vec<Option<FlatEntry>>,
}

#[derive(Debug, Deserialize)]
struct FlatEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoInfo {
    id: String,
    #[serde(default)]
    title: Option<String>,
}

/// Lists playlists by running `yt-dlp`; needs no credentials.
#[derive(Debug, Clone, Default)]
pub struct YtDlpSource {
    ytdlp: YtDlp,
}

impl YtDlpSource {
    /// Creates a source around the given program handle.
    #[must_use]
    pub fn new(ytdlp: YtDlp) -> Self {
        Self { ytdlp }
    }
}

#[async_trait]
impl PlaylistSource for YtDlpSource {
    fn name(&self) -> &'static str {
        "ytdlp"
    }

    #[instrument(skip(self, playlist), fields(playlist = %playlist))]
    async fn fetch_manifest(&self, playlist: &PlaylistRef) -> Result<RemoteManifest, SourceError> {
        let url = playlist.url();
        let output = self
            .ytdlp
            .run([
                "--flat-playlist",
                "--dump-single-json",
                "--no-warnings",
                url.as_str(),
            ])
            .await
            .map_err(|e| {
                SourceError::unavailable(
                    playlist.id(),
                    format!("cannot run {}: {e}", self.ytdlp.program().display()),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::unavailable(playlist.id(), last_error_line(&stderr)));
        }

        let manifest = parse_flat_playlist(playlist, &output.stdout)?;
        info!(tracks = manifest.len(), title = %manifest.title, "playlist listed");
        Ok(manifest)
    }

    #[instrument(skip(self))]
    async fn fetch_track(&self, url: &str) -> Result<Track, SourceError> {
        let id = parse_video_id(url)?;
        let watch_url = Track::new(id.clone(), "", 0).url();
        let output = self
            .ytdlp
            .run([
                "--dump-single-json",
                "--no-playlist",
                "--no-warnings",
                watch_url.as_str(),
            ])
            .await
            .map_err(|e| {
                SourceError::unavailable(
                    url,
                    format!("cannot run {}: {e}", self.ytdlp.program().display()),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::unavailable(url, last_error_line(&stderr)));
        }

        let track = parse_single_video(url, &output.stdout)?;
        debug!(id = %track.id, title = %track.title, "video resolved");
        Ok(track)
    }
}

/// Parses `yt-dlp --flat-playlist --dump-single-json` output.
///
/// Entries without a valid id are skipped with a warning. Private/deleted
/// placeholders that still carry an id are recorded as unavailable rather than
/// tracks. Positions are assigned densely in listing order.
///
/// # Errors
///
/// Returns [`SourceError::InvalidResponse`] when the output is not the
/// expected JSON document.
pub fn parse_flat_playlist(playlist: &PlaylistRef, stdout: &[u8]) -> Result<RemoteManifest, SourceError> {
    let parsed: FlatPlaylist = serde_json::from_slice(stdout)
        .map_err(|e| SourceError::invalid_response(playlist.id(), e.to_string()))?;

    let mut tracks = Vec::with_capacity(parsed.entries.len());
    let mut unavailable = Vec::new();
    for entry in parsed.entries.into_iter().flatten() {
        let title = entry.title.unwrap_or_default();
        let Some(id) = entry.id.and_then(|raw| TrackId::new(raw).ok()) else {
            warn!(title = %title, "skipping entry without a valid video id");
            continue;
        };
        if is_unavailable_placeholder(&title) {
            warn!(id = %id, title = %title, "playlist entry is unavailable; keeping local copy");
            unavailable.push(id);
            continue;
        }
        let position = tracks.len();
        tracks.push(Track::new(id, title, position));
    }

    Ok(RemoteManifest::new(
        parsed.id.unwrap_or_else(|| playlist.id().to_string()),
        parsed.title.unwrap_or_default(),
        tracks,
    )
    .with_unavailable(unavailable))
}

/// Parses `yt-dlp --dump-single-json --no-playlist` output for one video.
///
/// # Errors
///
/// Returns [`SourceError::InvalidResponse`] when the output cannot be parsed
/// or carries an invalid id.
pub fn parse_single_video(reference: &str, stdout: &[u8]) -> Result<Track, SourceError> {
    let info: VideoInfo = serde_json::from_slice(stdout)
        .map_err(|e| SourceError::invalid_response(reference, e.to_string()))?;
    let id = TrackId::new(info.id).map_err(|e| SourceError::invalid_response(reference, e.to_string()))?;
    Ok(Track::new(id, info.title.unwrap_or_default(), 0))
}
