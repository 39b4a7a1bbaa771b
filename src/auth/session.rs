//! Scoped credential session passed explicitly to API calls.

use std::path::{Path, PathBuf};

use chrono::Utc;
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use super::flow;
use super::token::{ClientSecrets, StoredToken, TokenStore};
use super::AuthError;

/// Where credentials live on disk.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Authorized-user token file.
    pub store: TokenStore,
    /// OAuth client secrets file used for interactive authorization.
    pub client_secrets: PathBuf,
}

impl Credentials {
    /// Creates credential locations.
    #[must_use]
    pub fn new(token_file: impl Into<PathBuf>, client_secrets: impl Into<PathBuf>) -> Self {
        Self {
            store: TokenStore::new(token_file),
            client_secrets: client_secrets.into(),
        }
    }
}

/// An authenticated session.
///
/// Obtained with [`Session::acquire`] and handed to every API call that
/// needs a bearer token. [`Session::release`] persists a token that was
/// refreshed or newly authorized during the session.
#[derive(Debug)]
pub struct Session {
    token: StoredToken,
    store: Option<TokenStore>,
    dirty: bool,
}

impl Session {
    /// Wraps an in-memory token that is never persisted.
    #[must_use]
    pub fn from_token(token: StoredToken) -> Self {
        Self {
            token,
            store: None,
            dirty: false,
        }
    }

    /// Loads a usable token, refreshing or authorizing interactively as needed.
    ///
    /// Order: a valid stored token is used as-is; an expired refreshable
    /// token is refreshed; otherwise the loopback authorization flow runs
    /// with the client secrets file, calling `on_url` with the consent URL.
    /// A newly obtained token is saved immediately.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SecretsMissing`] when authorization is needed and
    /// no client secrets file exists, plus any refresh or flow error.
    pub async fn acquire<F>(
        credentials: &Credentials,
        http: &Client,
        on_url: F,
    ) -> Result<Self, AuthError>
    where
        F: FnOnce(&Url) + Send,
    {
        let stored = credentials.store.load()?;

        if let Some(token) = stored {
            if token.is_valid_at(Utc::now()) {
                debug!("using stored access token");
                return Ok(Self::persisted(token, credentials, false));
            }
            if token.is_refreshable() {
                match flow::refresh(http, &token).await {
                    Ok(refreshed) => {
                        let session = Self::persisted(refreshed, credentials, true);
                        session.save()?;
                        return Ok(session);
                    }
                    Err(AuthError::TokenEndpoint { status, message }) => {
                        warn!(status, %message, "refresh rejected, re-authorizing");
                    }
                    Err(other) => return Err(other),
                }
            }
        }

        Self::login(credentials, http, on_url).await
    }

    /// Runs the loopback authorization flow unconditionally and saves the token.
    ///
    /// # Errors
    ///
    /// Returns secrets, flow, or IO errors.
    pub async fn login<F>(credentials: &Credentials, http: &Client, on_url: F) -> Result<Self, AuthError>
    where
        F: FnOnce(&Url) + Send,
    {
        let secrets = ClientSecrets::load(&credentials.client_secrets)?;
        let token = flow::authorize(http, &secrets, on_url).await?;
        let session = Self::persisted(token, credentials, true);
        session.save()?;
        info!(path = %credentials.store.path().display(), "authorization stored");
        Ok(session)
    }

    /// Removes the stored token. Returns whether a token file existed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Io`] when the file cannot be removed.
    pub fn logout(credentials: &Credentials) -> Result<bool, AuthError> {
        credentials.store.remove()
    }

    fn persisted(token: StoredToken, credentials: &Credentials, dirty: bool) -> Self {
        Self {
            token,
            store: Some(credentials.store.clone()),
            dirty,
        }
    }

    fn save(&self) -> Result<(), AuthError> {
        match &self.store {
            Some(store) => store.save(&self.token),
            None => Ok(()),
        }
    }

    /// Bearer token for API requests.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AuthorizationRequired`] when the session holds no
    /// access token.
    pub fn access_token(&self) -> Result<&str, AuthError> {
        self.token
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::AuthorizationRequired)
    }

    /// Underlying token.
    #[must_use]
    pub fn token(&self) -> &StoredToken {
        &self.token
    }

    /// Token file backing this session, if any.
    #[must_use]
    pub fn token_file(&self) -> Option<&Path> {
        self.store.as_ref().map(TokenStore::path)
    }

    /// Ends the session, persisting the token when it changed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Io`] when the token cannot be written.
    pub fn release(self) -> Result<(), AuthError> {
        if self.dirty {
            self.save()?;
            debug!("session token persisted on release");
        }
        Ok(())
    }
}
