//! Remote playlist sources.
//!
//! A [`PlaylistSource`] turns a playlist reference into an ordered
//! [`RemoteManifest`] snapshot, and a single video URL into a [`Track`].
//!
//! # Architecture
//!
//! - [`PlaylistSource`] - async trait implemented by each backend
//! - [`YtDlpSource`] - flat playlist listing through the `yt-dlp` program
//! - [`ApiPlaylistSource`] - paged listing through the YouTube Data API
//! - [`PlaylistRef`] / [`parse_video_id`] - reference parsing

mod api;
mod error;
mod ytdlp;

pub use api::ApiPlaylistSource;
pub use error::SourceError;
pub use ytdlp::{YtDlpSource, parse_flat_playlist, parse_single_video};

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use url::Url;

use crate::model::{RemoteManifest, Track, TrackId, is_identity_char, playlist_url};

/// Backend that can list playlists and look up single videos.
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Short backend name for logging.
    fn name(&self) -> &'static str;

    /// Fetches an ordered snapshot of the playlist.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::RemoteUnavailable`] when the playlist cannot be
    /// listed; callers treat this as fatal to the invocation.
    async fn fetch_manifest(&self, playlist: &PlaylistRef) -> Result<RemoteManifest, SourceError>;

    /// Looks up a single video by URL or id.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidReference`] for unparseable input and
    /// [`SourceError::RemoteUnavailable`] when the video cannot be resolved.
    async fn fetch_track(&self, url: &str) -> Result<Track, SourceError>;
}

/// Which backend lists playlists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// `yt-dlp --flat-playlist`; needs no credentials.
    #[default]
    YtDlp,
    /// YouTube Data API; needs an authorized session.
    Api,
}

impl SourceKind {
    /// Configuration spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::YtDlp => "ytdlp",
            Self::Api => "api",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ytdlp" | "yt-dlp" => Ok(Self::YtDlp),
            "api" => Ok(Self::Api),
            other => Err(format!("unknown source '{other}': expected 'ytdlp' or 'api'")),
        }
    }
}

/// Reference to a remote playlist, normalized to its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaylistRef {
    id: String,
}

impl PlaylistRef {
    /// Parses a bare playlist id or any YouTube URL carrying `list=`.
    ///
    /// ```
    /// use playlist_core::source::PlaylistRef;
    ///
    /// let by_url = PlaylistRef::parse("https://www.youtube.com/playlist?list=PLabc_123").unwrap();
    /// let bare = PlaylistRef::parse("PLabc_123").unwrap();
    /// assert_eq!(by_url, bare);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidReference`] when no playlist id can be
    /// extracted.
    pub fn parse(input: &str) -> Result<Self, SourceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SourceError::invalid_reference(input, "empty playlist reference"));
        }

        if let Ok(url) = Url::parse(trimmed) {
            if !is_youtube_host(&url) {
                return Err(SourceError::invalid_reference(input, "not a YouTube URL"));
            }
            let id = url
                .query_pairs()
                .find(|(key, _)| key == "list")
                .map(|(_, value)| value.into_owned())
                .filter(|value| is_valid_id(value))
                .ok_or_else(|| SourceError::invalid_reference(input, "URL has no playlist id (list=)"))?;
            return Ok(Self { id });
        }

        if is_valid_id(trimmed) {
            return Ok(Self {
                id: trimmed.to_string(),
            });
        }
        Err(SourceError::invalid_reference(input, "not a playlist id or URL"))
    }

    /// Playlist id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Canonical playlist URL.
    #[must_use]
    pub fn url(&self) -> String {
        playlist_url(&self.id)
    }
}

impl fmt::Display for PlaylistRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Extracts a video id from a bare id, `watch?v=`, `youtu.be/`, `shorts/`,
/// `embed/` or `live/` URL.
///
/// # Errors
///
/// Returns [`SourceError::InvalidReference`] when no video id is present.
pub fn parse_video_id(input: &str) -> Result<TrackId, SourceError> {
    let trimmed = input.trim();
    let Ok(url) = Url::parse(trimmed) else {
        return TrackId::new(trimmed)
            .map_err(|e| SourceError::invalid_reference(input, e.to_string()));
    };
    if !is_youtube_host(&url) {
        return Err(SourceError::invalid_reference(input, "not a YouTube URL"));
    }

    let from_query = url
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned());
    let from_path = || {
        let mut segments = url.path_segments()?;
        let first = segments.next()?;
        if url.host_str().is_some_and(|host| host.ends_with("youtu.be")) {
            return Some(first.to_string());
        }
        match first {
            "shorts" | "embed" | "live" | "v" => segments.next().map(str::to_string),
            _ => None,
        }
    };

    from_query
        .or_else(from_path)
        .and_then(|raw| TrackId::new(raw).ok())
        .ok_or_else(|| SourceError::invalid_reference(input, "URL has no video id"))
}

fn is_youtube_host(url: &Url) -> bool {
    url.host_str().is_some_and(|host| {
        let host = host.trim_start_matches("www.").trim_start_matches("m.");
        host == "youtube.com"
            || host == "music.youtube.com"
            || host == "youtu.be"
            || host == "youtube-nocookie.com"
    })
}

fn is_valid_id(value: &str) -> bool {
    !value.is_empty() && value.chars().all(is_identity_char)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_ref_from_url_variants() {
        for input in [
            "https://www.youtube.com/playlist?list=PL123",
            "https://youtube.com/watch?v=abc&list=PL123&index=2",
            "https://music.youtube.com/playlist?list=PL123",
            "https://m.youtube.com/playlist?list=PL123",
            "  PL123  ",
        ] {
            let parsed = PlaylistRef::parse(input).unwrap();
            assert_eq!(parsed.id(), "PL123", "input: {input}");
        }
    }

    #[test]
    fn test_playlist_ref_rejects_bad_input() {
        assert!(PlaylistRef::parse("").is_err());
        assert!(PlaylistRef::parse("https://www.youtube.com/watch?v=abc").is_err());
        assert!(PlaylistRef::parse("https://example.com/playlist?list=PL1").is_err());
        assert!(PlaylistRef::parse("not an id!").is_err());
    }

    #[test]
    fn test_playlist_ref_url() {
        let parsed = PlaylistRef::parse("PLx").unwrap();
        assert_eq!(parsed.url(), "https://www.youtube.com/playlist?list=PLx");
        assert_eq!(parsed.to_string(), "PLx");
    }

    #[test]
    fn test_parse_video_id_variants() {
        for input in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=42",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://music.youtube.com/watch?v=dQw4w9WgXcQ&list=PL1",
            "dQw4w9WgXcQ",
        ] {
            assert_eq!(
                parse_video_id(input).unwrap().as_str(),
                "dQw4w9WgXcQ",
                "input: {input}"
            );
        }
    }

    #[test]
    fn test_parse_video_id_rejects_non_video_urls() {
        assert!(parse_video_id("https://www.youtube.com/playlist?list=PL1").is_err());
        assert!(parse_video_id("https://vimeo.com/123").is_err());
        assert!(parse_video_id("two words").is_err());
    }

    #[test]
    fn test_source_kind_parsing() {
        assert_eq!("ytdlp".parse::<SourceKind>().unwrap(), SourceKind::YtDlp);
        assert_eq!("yt-dlp".parse::<SourceKind>().unwrap(), SourceKind::YtDlp);
        assert_eq!("API".parse::<SourceKind>().unwrap(), SourceKind::Api);
        assert!("rss".parse::<SourceKind>().is_err());
        assert_eq!(SourceKind::default().to_string(), "ytdlp");
    }
}
