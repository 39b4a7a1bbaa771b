//! Playlist listing through the YouTube Data API.

use async_trait::async_trait;
use tracing::{info, instrument};

use super::{PlaylistRef, PlaylistSource, SourceError, parse_video_id};
use crate::auth::Session;
use crate::model::{RemoteManifest, Track};
use crate::youtube::{ApiError, YouTubeClient};

/// Lists playlists with an authorized session; sees private playlists the
/// session owns.
#[derive(Debug)]
pub struct ApiPlaylistSource {
    client: YouTubeClient,
    session: Session,
}

impl ApiPlaylistSource {
    /// Creates a source bound to a session.
    #[must_use]
    pub fn new(client: YouTubeClient, session: Session) -> Self {
        Self { client, session }
    }

    /// Gives the session back so the caller can release it.
    #[must_use]
    pub fn into_session(self) -> Session {
        self.session
    }
}

fn map_api_error(reference: &str, error: ApiError) -> SourceError {
    match error {
        ApiError::Decode { reason, .. } => SourceError::invalid_response(reference, reason),
        other => SourceError::unavailable(reference, other.to_string()),
    }
}

#[async_trait]
impl PlaylistSource for ApiPlaylistSource {
    fn name(&self) -> &'static str {
        "api"
    }

    #[instrument(skip(self, playlist), fields(playlist = %playlist))]
    async fn fetch_manifest(&self, playlist: &PlaylistRef) -> Result<RemoteManifest, SourceError> {
        let info = self
            .client
            .playlist(&self.session, playlist.id())
            .await
            .map_err(|e| map_api_error(playlist.id(), e))?;
        let items = self
            .client
            .list_playlist_items(&self.session, playlist.id())
            .await
            .map_err(|e| map_api_error(playlist.id(), e))?;
        info!(tracks = items.tracks.len(), title = %info.title, "playlist listed");
        Ok(RemoteManifest::new(info.id, info.title, items.tracks).with_unavailable(items.unavailable))
    }

    async fn fetch_track(&self, url: &str) -> Result<Track, SourceError> {
        let id = parse_video_id(url)?;
        self.client
            .video(&self.session, &id)
            .await
            .map_err(|e| map_api_error(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_remote_unavailable() {
        let err = map_api_error("PL1", ApiError::not_found("playlist", "PL1"));
        assert!(matches!(err, SourceError::RemoteUnavailable { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_decode_maps_to_invalid_response() {
        let err = map_api_error("PL1", ApiError::decode("playlistItems.list", "missing field"));
        assert!(matches!(err, SourceError::InvalidResponse { .. }));
    }
}
