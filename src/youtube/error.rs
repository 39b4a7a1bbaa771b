//! Error types for YouTube Data API calls.

use thiserror::Error;

use crate::auth::AuthError;

/// Errors returned by [`super::YouTubeClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client construction failed: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Transport failure (DNS, connect, timeout).
    #[error("network error calling {endpoint}: {source}")]
    Network {
        /// API endpoint path.
        endpoint: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("YouTube API {endpoint} returned HTTP {status}: {message}")]
    HttpStatus {
        /// API endpoint path.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("unexpected response from {endpoint}: {reason}")]
    Decode {
        /// API endpoint path.
        endpoint: String,
        /// What failed to decode.
        reason: String,
    },

    /// The requested resource does not exist or is not visible.
    #[error("{resource} '{id}' not found")]
    NotFound {
        /// Resource kind ("playlist", "video").
        resource: &'static str,
        /// Resource id.
        id: String,
    },

    /// The session could not provide a bearer token.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    /// Creates a network error for an endpoint.
    pub fn network(endpoint: &str, source: reqwest::Error) -> Self {
        Self::Network {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    /// Creates a decode error for an endpoint.
    pub fn decode(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Whether the error means the resource is missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::HttpStatus { status: 404, .. }
        )
    }
}
