//! YouTube Data API v3 client.
//!
//! Covers the handful of calls the tool needs: playlist insert, delete and
//! lookup, paged playlist item listing, and single video lookup. Every call
//! takes the caller's [`Session`] explicitly.

mod error;
mod wire;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::auth::Session;
use crate::model::{Track, TrackId, is_unavailable_placeholder, playlist_url};
use crate::user_agent;

pub use error::ApiError;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Default request timeout.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Maximum page size accepted by `playlistItems.list`.
const PAGE_SIZE: &str = "50";

/// Visibility of a newly created playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Privacy {
    /// Only the owner can see it.
    #[default]
    Private,
    /// Anyone with the link can see it.
    Unlisted,
    /// Listed publicly.
    Public,
}

impl Privacy {
    /// API `privacyStatus` value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Unlisted => "unlisted",
            Self::Public => "public",
        }
    }
}

/// Minimal playlist metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistInfo {
    /// Playlist id.
    pub id: String,
    /// Playlist title.
    pub title: String,
}

/// Items of a playlist listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaylistItems {
    /// Playable tracks in playlist order.
    pub tracks: Vec<Track>,
    /// Ids of private or deleted entries still listed.
    pub unavailable: Vec<TrackId>,
}

/// Builds the shared HTTP client for API and token endpoint traffic.
///
/// # Errors
///
/// Returns [`ApiError::ClientBuild`] when reqwest cannot build the client.
pub fn build_http_client(timeout: Duration) -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(timeout)
        .user_agent(user_agent::default_user_agent())
        .gzip(true)
        .build()
        .map_err(ApiError::ClientBuild)
}

/// Client for the YouTube Data API.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    http: Client,
    base_url: String,
}

impl YouTubeClient {
    /// Creates a client against the production API.
    #[must_use]
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom API root (used by tests).
    #[must_use]
    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Creates a playlist and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decode failure.
    #[instrument(skip(self, session, description), fields(privacy = privacy.as_str()))]
    pub async fn create_playlist(
        &self,
        session: &Session,
        title: &str,
        description: &str,
        privacy: Privacy,
    ) -> Result<String, ApiError> {
        let endpoint = "playlists.insert";
        let body = wire::PlaylistInsert {
            snippet: wire::InsertSnippet { title, description },
            status: wire::InsertStatus {
                privacy_status: privacy.as_str(),
            },
        };
        let request = self
            .http
            .post(self.url("playlists"))
            .query(&[("part", "snippet,status")])
            .json(&body);
        let created: wire::CreatedResource = self.send_json(endpoint, session, request).await?;
        info!(playlist_id = %created.id, "playlist created");
        Ok(created.id)
    }

    /// Deletes a playlist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the playlist does not exist and
    /// other [`ApiError`] variants on failure.
    #[instrument(skip(self, session))]
    pub async fn delete_playlist(&self, session: &Session, playlist_id: &str) -> Result<(), ApiError> {
        let endpoint = "playlists.delete";
        let request = self
            .http
            .delete(self.url("playlists"))
            .query(&[("id", playlist_id)]);
        match self.send(endpoint, session, request).await {
            Ok(_) => {
                info!("playlist deleted");
                Ok(())
            }
            Err(error) if error.is_not_found() => Err(ApiError::not_found("playlist", playlist_id)),
            Err(error) => Err(error),
        }
    }

    /// Looks up a playlist's metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the playlist does not exist or is
    /// not visible to the session.
    #[instrument(skip(self, session))]
    pub async fn playlist(&self, session: &Session, playlist_id: &str) -> Result<PlaylistInfo, ApiError> {
        let endpoint = "playlists.list";
        let request = self
            .http
            .get(self.url("playlists"))
            .query(&[("part", "snippet"), ("id", playlist_id)]);
        let response: wire::ListResponse<wire::Resource> =
            match self.send_json(endpoint, session, request).await {
                Err(error) if error.is_not_found() => {
                    return Err(ApiError::not_found("playlist", playlist_id));
                }
                other => other?,
            };
        let resource = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found("playlist", playlist_id))?;
        Ok(PlaylistInfo {
            id: resource.id,
            title: resource.snippet.unwrap_or_default().title,
        })
    }

    /// Whether the playlist exists and is visible to the session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for failures other than "not found".
    pub async fn playlist_exists(&self, session: &Session, playlist_id: &str) -> Result<bool, ApiError> {
        match self.playlist(session, playlist_id).await {
            Ok(_) => Ok(true),
            Err(error) if error.is_not_found() => Ok(false),
            Err(error) => Err(error),
        }
    }

    /// Share URL of an existing playlist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the playlist does not exist.
    pub async fn share_url(&self, session: &Session, playlist_id: &str) -> Result<String, ApiError> {
        let info = self.playlist(session, playlist_id).await?;
        Ok(playlist_url(&info.id))
    }

    /// Lists every playable item of a playlist, following pagination.
    ///
    /// Entries without a usable video id are skipped with a warning. Private
    /// and deleted placeholders go to [`PlaylistItems::unavailable`].
    /// Positions are renumbered densely in playlist order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the playlist does not exist.
    #[instrument(skip(self, session))]
    pub async fn list_playlist_items(
        &self,
        session: &Session,
        playlist_id: &str,
    ) -> Result<PlaylistItems, ApiError> {
        let endpoint = "playlistItems.list";
        let mut items = PlaylistItems::default();
        let mut page_token: Option<String> = None;
        let mut pages = 0_usize;

        loop {
            let mut query = vec![
                ("part", "snippet"),
                ("playlistId", playlist_id),
                ("maxResults", PAGE_SIZE),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let request = self.http.get(self.url("playlistItems")).query(&query);
            let page: wire::ListResponse<wire::PlaylistItem> =
                match self.send_json(endpoint, session, request).await {
                    Err(error) if error.is_not_found() => {
                        return Err(ApiError::not_found("playlist", playlist_id));
                    }
                    other => other?,
                };
            pages += 1;

            for item in page.items {
                let snippet = item.snippet;
                let Some(id) = snippet
                    .resource_id
                    .video_id
                    .and_then(|raw| TrackId::new(raw).ok())
                else {
                    warn!(title = %snippet.title, "skipping entry without a valid video id");
                    continue;
                };
                if is_unavailable_placeholder(&snippet.title) {
                    warn!(id = %id, title = %snippet.title, "playlist entry is unavailable");
                    items.unavailable.push(id);
                    continue;
                }
                let position = items.tracks.len();
                items.tracks.push(Track::new(id, snippet.title, position));
            }

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(
            pages,
            tracks = items.tracks.len(),
            unavailable = items.unavailable.len(),
            "playlist items listed"
        );
        Ok(items)
    }

    /// Looks up a single video.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the video does not exist.
    #[instrument(skip(self, session))]
    pub async fn video(&self, session: &Session, video_id: &TrackId) -> Result<Track, ApiError> {
        let endpoint = "videos.list";
        let request = self
            .http
            .get(self.url("videos"))
            .query(&[("part", "snippet"), ("id", video_id.as_str())]);
        let response: wire::ListResponse<wire::Resource> =
            self.send_json(endpoint, session, request).await?;
        let resource = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found("video", video_id.as_str()))?;
        Ok(Track::new(
            video_id.clone(),
            resource.snippet.unwrap_or_default().title,
            0,
        ))
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{resource}", self.base_url)
    }

    async fn send(
        &self,
        endpoint: &str,
        session: &Session,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        let response = request
            .bearer_auth(session.access_token()?)
            .send()
            .await
            .map_err(|e| ApiError::network(endpoint, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<wire::ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .ok()
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| body.trim().to_string());
        warn!(endpoint, status = status.as_u16(), %message, "API call failed");
        Err(ApiError::HttpStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        session: &Session,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(endpoint, session, request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(endpoint, e))?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::decode(endpoint, e.to_string()))
    }
}
