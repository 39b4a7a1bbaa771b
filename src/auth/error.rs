//! Error types for credential handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading, refreshing, or obtaining credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The OAuth client secrets file does not exist.
    #[error(
        "client secrets file {path} not found\n  Suggestion: download it from the Google Cloud Console (OAuth client, Desktop app)"
    )]
    SecretsMissing {
        /// Expected location.
        path: PathBuf,
    },

    /// The client secrets file could not be parsed.
    #[error("invalid client secrets file {path}: {reason}")]
    InvalidSecrets {
        /// File that failed to parse.
        path: PathBuf,
        /// Parse failure description.
        reason: String,
    },

    /// The stored token file is unreadable or malformed.
    #[error("token file {path} is corrupt or invalid: {reason}")]
    CorruptToken {
        /// Token file.
        path: PathBuf,
        /// Parse failure description.
        reason: String,
    },

    /// File system error reading or writing credential files.
    #[error("IO error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// No usable token exists and no interactive authorization was attempted.
    #[error("authorization required\n  Suggestion: run `playlist-downloader auth login`")]
    AuthorizationRequired,

    /// The token endpoint rejected a request.
    #[error("token endpoint returned HTTP {status}: {message}")]
    TokenEndpoint {
        /// HTTP status code.
        status: u16,
        /// Error description from the response body.
        message: String,
    },

    /// Network failure talking to the token endpoint.
    #[error("network error contacting {endpoint}: {source}")]
    Network {
        /// Endpoint URL.
        endpoint: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The browser authorization callback failed.
    #[error("authorization callback failed: {reason}")]
    Callback {
        /// What went wrong.
        reason: String,
    },
}

impl AuthError {
    /// Creates an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a network error with endpoint context.
    pub fn network(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// Creates a callback error.
    pub fn callback(reason: impl Into<String>) -> Self {
        Self::Callback {
            reason: reason.into(),
        }
    }
}
