//! Error types for remote playlist sources.

use thiserror::Error;

/// Errors from listing a playlist or resolving a video.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The remote playlist or video could not be listed. Fatal to the run.
    #[error("remote {reference} is unavailable: {reason}")]
    RemoteUnavailable {
        /// Playlist id or video URL.
        reference: String,
        /// Human-readable cause.
        reason: String,
    },

    /// The input is not a usable playlist or video reference.
    #[error("invalid reference '{input}': {reason}")]
    InvalidReference {
        /// Raw input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The backend answered with data that could not be interpreted.
    #[error("invalid response for {reference}: {reason}")]
    InvalidResponse {
        /// Playlist id or video URL.
        reference: String,
        /// What failed to parse.
        reason: String,
    },
}

impl SourceError {
    /// Creates a remote-unavailable error.
    pub fn unavailable(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid-reference error.
    pub fn invalid_reference(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reference: reference.into(),
            reason: reason.into(),
        }
    }
}
