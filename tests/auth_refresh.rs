//! Integration tests for session acquisition: stored tokens, refresh, and
//! persistence of refreshed credentials.

use playlist_core::auth::{AuthError, Credentials, Session, TokenStore};
use reqwest::Client;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::{expired_token, start_mock_server_or_skip};

macro_rules! require_mock_server {
    () => {{
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        mock_server
    }};
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_saved() {
    let server = require_mock_server!();
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-access",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("token.json");
    let store = TokenStore::new(&token_file);
    store
        .save(&expired_token(&format!("{}/token", server.uri())))
        .unwrap();

    let credentials = Credentials::new(&token_file, dir.path().join("client_secret.json"));
    let session = Session::acquire(&credentials, &Client::new(), |_| {
        panic!("refresh must not prompt for consent");
    })
    .await
    .unwrap();
    assert_eq!(session.access_token().unwrap(), "fresh-access");
    session.release().unwrap();

    let saved = store.load().unwrap().unwrap();
    assert_eq!(saved.token.as_deref(), Some("fresh-access"));
    assert_eq!(saved.refresh_token.as_deref(), Some("refresh-me"));
}

#[tokio::test]
async fn test_rejected_refresh_without_secrets_requires_login() {
    let server = require_mock_server!();
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Token has been expired or revoked."
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("token.json");
    TokenStore::new(&token_file)
        .save(&expired_token(&format!("{}/token", server.uri())))
        .unwrap();

    let credentials = Credentials::new(&token_file, dir.path().join("missing_secret.json"));
    let err = Session::acquire(&credentials, &Client::new(), |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::SecretsMissing { .. }), "got {err:?}");
}
