//! OAuth 2.0 token endpoint calls and the loopback authorization flow.
//!
//! The loopback flow binds an ephemeral port on 127.0.0.1, prints the
//! consent URL, waits for the browser redirect carrying `code` and `state`,
//! then exchanges the code at the token endpoint.

use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;
use reqwest::Client;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::token::{ClientSecrets, StoredToken};
use super::AuthError;

/// Scope granting playlist management on the user's channel.
pub const YOUTUBE_SCOPE: &str = "https://www.googleapis.com/auth/youtube.force-ssl";

/// How long the loopback listener waits for the browser redirect.
pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

const STATE_LEN: usize = 32;

const CALLBACK_PAGE: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/plain; charset=utf-8\r\nConnection: close\r\n\r\nAuthorization complete. You can close this window.\r\n";

const CALLBACK_ERROR_PAGE: &str = "HTTP/1.1 400 Bad Request\r\nContent-Type: text/plain; charset=utf-8\r\nConnection: close\r\n\r\nAuthorization failed. Return to the terminal for details.\r\n";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

#[derive(Deserialize)]
struct TokenErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Refreshes an access token using the token's refresh token.
///
/// Returns the updated token; the refresh token is kept when the endpoint
/// does not rotate it.
///
/// # Errors
///
/// Returns [`AuthError::AuthorizationRequired`] when the token cannot be
/// refreshed, [`AuthError::TokenEndpoint`] when the endpoint rejects the
/// request, and [`AuthError::Network`] on transport failure.
#[instrument(skip(http, token), fields(token_uri = %token.token_uri))]
pub async fn refresh(http: &Client, token: &StoredToken) -> Result<StoredToken, AuthError> {
    let (Some(refresh_token), Some(client_id), Some(client_secret)) = (
        token.refresh_token.as_deref(),
        token.client_id.as_deref(),
        token.client_secret.as_deref(),
    ) else {
        return Err(AuthError::AuthorizationRequired);
    };

    let response = post_token_form(
        http,
        &token.token_uri,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ],
    )
    .await?;

    info!("access token refreshed");
    Ok(apply_response(token.clone(), response))
}

/// Runs the interactive loopback authorization flow.
///
/// `on_url` receives the consent URL once the listener is ready; the caller
/// decides how to show it to the user.
///
/// # Errors
///
/// Returns [`AuthError::Callback`] when the redirect never arrives, carries
/// an error, or fails state verification, and token endpoint errors from
/// the code exchange.
#[instrument(skip_all)]
pub async fn authorize<F>(
    http: &Client,
    secrets: &ClientSecrets,
    on_url: F,
) -> Result<StoredToken, AuthError>
where
    F: FnOnce(&Url) + Send,
{
    let listener = TcpListener::bind(("127.0.0.1", 0))
        .await
        .map_err(|e| AuthError::callback(format!("cannot bind loopback listener: {e}")))?;
    let port = listener
        .local_addr()
        .map_err(|e| AuthError::callback(e.to_string()))?
        .port();
    let redirect_uri = format!("http://127.0.0.1:{port}/");
    let state = random_state();

    let url = authorization_url(secrets, &redirect_uri, &state)?;
    debug!(port, "loopback listener ready");
    on_url(&url);

    let code = tokio::time::timeout(CALLBACK_TIMEOUT, accept_callback(&listener, &state))
        .await
        .map_err(|_| {
            AuthError::callback(format!(
                "no browser redirect within {} seconds",
                CALLBACK_TIMEOUT.as_secs()
            ))
        })??;

    let response = post_token_form(
        http,
        &secrets.token_uri,
        &[
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("client_id", secrets.client_id.as_str()),
            ("client_secret", secrets.client_secret.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
        ],
    )
    .await?;

    info!("authorization code exchanged");
    let base = StoredToken {
        token_uri: secrets.token_uri.clone(),
        client_id: Some(secrets.client_id.clone()),
        client_secret: Some(secrets.client_secret.clone()),
        scopes: vec![YOUTUBE_SCOPE.to_string()],
        ..StoredToken::default()
    };
    Ok(apply_response(base, response))
}

/// Builds the consent URL for the loopback flow.
///
/// # Errors
///
/// Returns [`AuthError::InvalidSecrets`] when the secrets' `auth_uri` is not
/// a valid URL.
pub fn authorization_url(
    secrets: &ClientSecrets,
    redirect_uri: &str,
    state: &str,
) -> Result<Url, AuthError> {
    let mut url = Url::parse(&secrets.auth_uri).map_err(|e| AuthError::InvalidSecrets {
        path: "auth_uri".into(),
        reason: e.to_string(),
    })?;
    url.query_pairs_mut()
        .append_pair("client_id", &secrets.client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", YOUTUBE_SCOPE)
        .append_pair("state", state)
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent");
    Ok(url)
}

async fn accept_callback(listener: &TcpListener, expected_state: &str) -> Result<String, AuthError> {
    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .map_err(|e| AuthError::callback(e.to_string()))?;
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        let mut request_line = String::new();
        reader
            .read_line(&mut request_line)
            .await
            .map_err(|e| AuthError::callback(e.to_string()))?;

        // Browsers also ask for /favicon.ico; ignore anything without a query.
        if !request_line.contains('?') {
            debug!(%peer, "ignoring request without query");
            let _ = write_half.write_all(CALLBACK_ERROR_PAGE.as_bytes()).await;
            continue;
        }

        let result = parse_callback(&request_line, expected_state);
        let page = if result.is_ok() {
            CALLBACK_PAGE
        } else {
            CALLBACK_ERROR_PAGE
        };
        if let Err(error) = write_half.write_all(page.as_bytes()).await {
            warn!(error = %error, "could not answer browser redirect");
        }
        let _ = write_half.shutdown().await;
        return result;
    }
}

/// Extracts the authorization code from the redirect request line.
pub(crate) fn parse_callback(request_line: &str, expected_state: &str) -> Result<String, AuthError> {
    let target = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| AuthError::callback("malformed redirect request"))?;
    let url = Url::parse("http://127.0.0.1")
        .and_then(|base| base.join(target))
        .map_err(|e| AuthError::callback(format!("malformed redirect target: {e}")))?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(AuthError::callback(format!("authorization denied: {error}")));
    }
    if state.as_deref() != Some(expected_state) {
        return Err(AuthError::callback("state mismatch in redirect"));
    }
    code.filter(|c| !c.is_empty())
        .ok_or_else(|| AuthError::callback("redirect carried no authorization code"))
}

async fn post_token_form(
    http: &Client,
    token_uri: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse, AuthError> {
    let response = http
        .post(token_uri)
        .form(form)
        .send()
        .await
        .map_err(|e| AuthError::network(token_uri, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<TokenErrorBody>(&body).map_or_else(
            |_| body.trim().to_string(),
            |parsed| match parsed.error_description {
                Some(description) => format!("{}: {description}", parsed.error),
                None => parsed.error,
            },
        );
        warn!(status = status.as_u16(), "token endpoint rejected request");
        return Err(AuthError::TokenEndpoint {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| AuthError::network(token_uri, e))
}

fn apply_response(mut token: StoredToken, response: TokenResponse) -> StoredToken {
    token.token = Some(response.access_token);
    token.expiry = response
        .expires_in
        .map(|secs| Utc::now() + chrono::Duration::seconds(secs));
    if let Some(refresh_token) = response.refresh_token {
        token.refresh_token = Some(refresh_token);
    }
    if let Some(scope) = response.scope {
        token.scopes = scope.split_whitespace().map(str::to_string).collect();
    }
    token
}

fn random_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LEN)
        .map(char::from)
        .collect()
}
