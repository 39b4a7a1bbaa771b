//! Authorized-user token file and OAuth client secrets.
//!
//! The token file uses Google's "authorized user" JSON layout (`token`,
//! `refresh_token`, `token_uri`, `client_id`, `client_secret`, `scopes`,
//! `expiry`) so tokens written by other Google tooling load unchanged.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::AuthError;

/// Google's OAuth 2.0 token endpoint.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Google's OAuth 2.0 authorization endpoint.
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";

/// Tokens expiring within this window are treated as expired.
const EXPIRY_SKEW_SECS: i64 = 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// OAuth token as persisted on disk.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct StoredToken {
    /// Current access token.
    #[serde(default)]
    pub token: Option<String>,
    /// Long-lived refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token endpoint used for refresh.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    /// OAuth client id.
    #[serde(default)]
    pub client_id: Option<String>,
    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Granted scopes.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Access token expiry.
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredToken {
    /// True when an access token exists and does not expire within the skew window.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.token.as_deref().is_none_or(str::is_empty) {
            return false;
        }
        self.expiry
            .is_none_or(|expiry| expiry > now + Duration::seconds(EXPIRY_SKEW_SECS))
    }

    /// True when the token carries everything needed for a refresh.
    #[must_use]
    pub fn is_refreshable(&self) -> bool {
        self.refresh_token.is_some() && self.client_id.is_some() && self.client_secret.is_some()
    }
}

// Custom Debug impl that redacts secrets.
impl fmt::Debug for StoredToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredToken")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("token_uri", &self.token_uri)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("scopes", &self.scopes)
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Reads and writes the token file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store backed by the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Token file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the token, returning `None` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CorruptToken`] for malformed content and
    /// [`AuthError::Io`] for read failures.
    pub fn load(&self) -> Result<Option<StoredToken>, AuthError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no token file");
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| AuthError::io(&self.path, e))?;
        let token = serde_json::from_str(&raw).map_err(|e| AuthError::CorruptToken {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        debug!(path = %self.path.display(), "token file loaded");
        Ok(Some(token))
    }

    /// Writes the token, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Io`] when the file cannot be written.
    pub fn save(&self, token: &StoredToken) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AuthError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(token).map_err(|e| AuthError::CorruptToken {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&self.path, json).map_err(|e| AuthError::io(&self.path, e))?;
        restrict_permissions(&self.path);
        info!(path = %self.path.display(), "token saved");
        Ok(())
    }

    /// Deletes the token file. Returns whether a file was removed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Io`] when an existing file cannot be removed.
    pub fn remove(&self) -> Result<bool, AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AuthError::io(&self.path, e)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(error) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!(path = %path.display(), error = %error, "could not restrict token file permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

/// OAuth client configuration from a Cloud Console `client_secret.json`.
#[derive(Clone, Deserialize)]
pub struct ClientSecrets {
    /// Client id.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
    /// Authorization endpoint.
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    /// Token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

impl fmt::Debug for ClientSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSecrets")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Deserialize)]
struct SecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Loads an `installed` (desktop) or `web` client secrets file.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SecretsMissing`] when the file does not exist and
    /// [`AuthError::InvalidSecrets`] when it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        if !path.exists() {
            return Err(AuthError::SecretsMissing {
                path: path.to_path_buf(),
            });
        }
        let raw = fs::read_to_string(path).map_err(|e| AuthError::io(path, e))?;
        Self::parse(&raw).map_err(|reason| AuthError::InvalidSecrets {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn parse(raw: &str) -> Result<Self, String> {
        let file: SecretsFile = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        file.installed
            .or(file.web)
            .ok_or_else(|| "expected an \"installed\" or \"web\" client section".to_string())
    }
}
