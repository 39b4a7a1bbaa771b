//! Playlist Downloader Core Library
//!
//! Keeps a local directory of MP3 files in step with a YouTube playlist and
//! manages playlists through the YouTube Data API.
//!
//! # Architecture
//!
//! - [`model`] / [`identity`] - tracks, manifests, and the filename identity encoding
//! - [`reconcile`] - pure computation of fetch/skip/delete plans
//! - [`inventory`] - local directory scanning
//! - [`source`] - remote playlist listing (`yt-dlp` or the Data API)
//! - [`fetch`] / [`delete`] / [`execute`] - applying a plan concurrently
//! - [`sync`] / [`import`] - end-to-end playlist sync and bulk import
//! - [`youtube`] / [`auth`] - Data API client and OAuth sessions
//! - [`layout`] - per-artist destination folders
//! - [`tags`] - embedded ID3 metadata of fetched files
//! - [`i18n`] - English and French user messages

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod delete;
pub mod execute;
pub mod fetch;
pub mod i18n;
pub mod identity;
pub mod import;
pub mod inventory;
pub mod layout;
pub mod model;
pub mod reconcile;
pub mod source;
pub mod sync;
pub mod tags;
pub mod youtube;
pub mod ytdlp;

mod user_agent;

// Re-export commonly used types
pub use auth::{AuthError, Credentials, Session};
pub use execute::{DEFAULT_CONCURRENCY, ExecutionReport, ExecutionStats, PlanExecutor};
pub use fetch::{DEFAULT_MAX_RETRIES, FetchError, Fetcher, RetryPolicy, YtDlpFetcher};
pub use model::{LocalFile, RemoteManifest, Track, TrackId};
pub use reconcile::{ReconcilePolicy, ReconciliationPlan, reconcile};
pub use source::{PlaylistRef, PlaylistSource, SourceError, SourceKind};
pub use youtube::{ApiError, YouTubeClient};
