//! Authentication for the YouTube API.
//!
//! # Overview
//!
//! - [`Authenticator`]: supplies bearer tokens to the request engine
//! - [`Account`]: a Google account authorized through OAuth 2.0
//! - [`ContentOwner`]: a partner account acting on behalf of its channels
//! - [`StateParam`]: CSRF state for the authorization URL
//! - [`MissingAuthError`]: raised when no usable credentials are available
//!
//! Requests made with only an API key need no authenticator; see
//! [`YtConfig`](crate::YtConfig).

mod account;
mod content_owner;
mod error;
mod state;

pub use account::{Account, AccountBuilder, DeviceCode, DEFAULT_SCOPES, SCOPE_PREFIX};
pub use content_owner::{ContentOwner, CONTENT_OWNER_SCOPES};
pub use error::MissingAuthError;
pub use state::StateParam;

use async_trait::async_trait;

use crate::clients::HttpError;

/// Supplies the bearer token of an authenticated request.
///
/// The request engine calls [`access_token`](Self::access_token) once per
/// attempt and [`refresh_access_token`](Self::refresh_access_token) at most
/// once per request, after a 401.
#[async_trait]
pub trait Authenticator: Send + Sync + std::fmt::Debug {
    /// Returns the current token, obtaining one first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::MissingAuth`] when no token can be obtained, or the
    /// error of the token request.
    async fn access_token(&self) -> Result<String, HttpError>;

    /// Tries to replace the current token with a fresh one.
    ///
    /// Returns `Ok(false)` if this authenticator cannot refresh.
    ///
    /// # Errors
    ///
    /// Returns the error of the token request.
    async fn refresh_access_token(&self) -> Result<bool, HttpError>;

    /// Returns the content owner every request is made on behalf of, if any.
    fn on_behalf_of_content_owner(&self) -> Option<&str> {
        None
    }
}
