//! Configuration types for the YouTube client.
//!
//! # Overview
//!
//! - [`YtConfig`]: all settings shared by the HTTP engine and the accounts
//! - [`YtConfigBuilder`]: a builder for constructing [`YtConfig`] instances
//! - [`ApiKey`], [`ClientId`], [`ClientSecret`], [`HostUrl`]: validated newtypes
//!
//! Configuration is instance-based: every client and account receives its
//! own `YtConfig`, there is no process-wide state.
//!
//! # Example
//!
//! ```rust
//! use yt::{YtConfig, ApiKey};
//!
//! let config = YtConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .debug(true)
//!     .build();
//!
//! assert!(config.debug());
//! ```

mod newtypes;

pub use newtypes::{ApiKey, ClientId, ClientSecret, HostUrl};

use crate::clients::RetryPolicy;
use crate::error::ConfigError;

/// Default host serving the YouTube Data API.
pub const DEFAULT_API_HOST: &str = "https://www.googleapis.com";

/// Default host serving the Google OAuth 2.0 endpoints.
pub const DEFAULT_OAUTH_HOST: &str = "https://accounts.google.com";

/// Configuration for the YouTube client.
///
/// # Debug flag
///
/// When [`debug`](Self::debug) is `false` (the default), error messages omit
/// the raw response body and the reconstructed curl command, both of which
/// may contain bearer tokens or API keys.
///
/// # Thread Safety
///
/// `YtConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug, Default)]
pub struct YtConfig {
    api_key: Option<ApiKey>,
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    debug: bool,
    user_agent_prefix: Option<String>,
    api_host: Option<HostUrl>,
    oauth_host: Option<HostUrl>,
    retry_policy: RetryPolicy,
}

impl YtConfig {
    /// Creates a new builder for constructing a `YtConfig`.
    #[must_use]
    pub fn builder() -> YtConfigBuilder {
        YtConfigBuilder::new()
    }

    /// Loads configuration from the process environment.
    ///
    /// Reads `YT_API_KEY`, `YT_CLIENT_ID`, `YT_CLIENT_SECRET` and
    /// `YT_LOG_LEVEL`. A log level of `debug` or `devel` turns the debug flag
    /// on. Unset or empty variables are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut builder = Self::builder();
        if let Some(key) = var("YT_API_KEY") {
            builder = builder.api_key(ApiKey::new(key)?);
        }
        if let Some(id) = var("YT_CLIENT_ID") {
            builder = builder.client_id(ClientId::new(id)?);
        }
        if let Some(secret) = var("YT_CLIENT_SECRET") {
            builder = builder.client_secret(ClientSecret::new(secret)?);
        }
        if let Some(level) = var("YT_LOG_LEVEL") {
            let level = level.trim().to_ascii_lowercase();
            builder = builder.debug(level == "debug" || level == "devel");
        }
        Ok(builder.build())
    }

    /// Returns the API key used by server apps, if configured.
    #[must_use]
    pub const fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    /// Returns the OAuth client ID, if configured.
    #[must_use]
    pub const fn client_id(&self) -> Option<&ClientId> {
        self.client_id.as_ref()
    }

    /// Returns the OAuth client secret, if configured.
    #[must_use]
    pub const fn client_secret(&self) -> Option<&ClientSecret> {
        self.client_secret.as_ref()
    }

    /// Returns both OAuth client credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] naming the first missing
    /// credential.
    pub fn client_credentials(&self) -> Result<(&ClientId, &ClientSecret), ConfigError> {
        let id = self
            .client_id
            .as_ref()
            .ok_or(ConfigError::MissingRequiredField { field: "client_id" })?;
        let secret = self
            .client_secret
            .as_ref()
            .ok_or(ConfigError::MissingRequiredField {
                field: "client_secret",
            })?;
        Ok((id, secret))
    }

    /// Returns whether request details are included in error messages.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the base URL of the Data API.
    #[must_use]
    pub fn api_host(&self) -> &str {
        self.api_host.as_ref().map_or(DEFAULT_API_HOST, AsRef::as_ref)
    }

    /// Returns the base URL of the OAuth endpoints.
    #[must_use]
    pub fn oauth_host(&self) -> &str {
        self.oauth_host
            .as_ref()
            .map_or(DEFAULT_OAUTH_HOST, AsRef::as_ref)
    }

    /// Returns the retry policy applied to every request.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }
}

// Verify YtConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<YtConfig>();
};

/// Builder for constructing [`YtConfig`] instances.
///
/// Every field is optional: a server app only needs an API key, a web or
/// device app needs a client ID and secret.
///
/// # Example
///
/// ```rust
/// use yt::{YtConfig, ClientId, ClientSecret, HostUrl};
///
/// let config = YtConfig::builder()
///     .client_id(ClientId::new("id.apps.googleusercontent.com").unwrap())
///     .client_secret(ClientSecret::new("secret").unwrap())
///     .api_host(HostUrl::new("http://localhost:8080").unwrap())
///     .user_agent_prefix("MyApp/1.0")
///     .build();
///
/// assert_eq!(config.api_host(), "http://localhost:8080");
/// ```
#[derive(Debug, Default)]
pub struct YtConfigBuilder {
    config: YtConfig,
}

impl YtConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key for server-app access.
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.config.api_key = Some(key);
        self
    }

    /// Sets the OAuth client ID.
    #[must_use]
    pub fn client_id(mut self, id: ClientId) -> Self {
        self.config.client_id = Some(id);
        self
    }

    /// Sets the OAuth client secret.
    #[must_use]
    pub fn client_secret(mut self, secret: ClientSecret) -> Self {
        self.config.client_secret = Some(secret);
        self
    }

    /// Includes raw bodies and curl commands in error messages.
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Overrides the Data API host.
    #[must_use]
    pub fn api_host(mut self, host: HostUrl) -> Self {
        self.config.api_host = Some(host);
        self
    }

    /// Overrides the OAuth host.
    #[must_use]
    pub fn oauth_host(mut self, host: HostUrl) -> Self {
        self.config.oauth_host = Some(host);
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config.retry_policy = policy;
        self
    }

    /// Builds the [`YtConfig`].
    #[must_use]
    pub fn build(self) -> YtConfig {
        self.config
    }
}
