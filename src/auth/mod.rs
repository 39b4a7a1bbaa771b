//! OAuth credentials for the YouTube Data API.
//!
//! Tokens are kept in Google's authorized-user JSON file. A [`Session`] is
//! acquired once per command and passed explicitly to API calls.

mod error;
mod flow;
mod session;
mod token;

pub use error::AuthError;
pub use flow::{CALLBACK_TIMEOUT, YOUTUBE_SCOPE, authorization_url, authorize, refresh};
pub use session::{Credentials, Session};
pub use token::{ClientSecrets, DEFAULT_AUTH_URI, DEFAULT_TOKEN_URI, StoredToken, TokenStore};
