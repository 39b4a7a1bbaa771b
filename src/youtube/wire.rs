//! JSON shapes of the YouTube Data API v3 resources this crate touches.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct PlaylistInsert<'a> {
    pub snippet: InsertSnippet<'a>,
    pub status: InsertStatus<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct InsertSnippet<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InsertStatus<'a> {
    pub privacy_status: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatedResource {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Resource {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<TitleSnippet>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct TitleSnippet {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct PlaylistItem {
    pub snippet: ItemSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ItemSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub position: Option<usize>,
    pub resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ResourceId {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    pub message: String,
}
