//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use playlist_core::auth::StoredToken;
use wiremock::MockServer;

/// Starts a mock server, or returns `None` when the sandbox forbids binding
/// local sockets.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if std::net::TcpListener::bind("127.0.0.1:0").is_err() {
        eprintln!("skipping: cannot bind local sockets");
        return None;
    }
    Some(MockServer::start().await)
}

/// Token good for another hour.
pub fn valid_token() -> StoredToken {
    StoredToken {
        token: Some("test-access".to_string()),
        expiry: Some(Utc::now() + Duration::hours(1)),
        ..StoredToken::default()
    }
}

/// Expired token that can be refreshed against `token_uri`.
pub fn expired_token(token_uri: &str) -> StoredToken {
    StoredToken {
        token: Some("stale-access".to_string()),
        refresh_token: Some("refresh-me".to_string()),
        token_uri: token_uri.to_string(),
        client_id: Some("client-id".to_string()),
        client_secret: Some("client-secret".to_string()),
        expiry: Some(Utc::now() - Duration::hours(1)),
        ..StoredToken::default()
    }
}

/// Creates an empty file and returns its path.
pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"audio").unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
    path
}
