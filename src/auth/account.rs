//! OAuth 2.0 accounts for the YouTube API.
//!
//! An [`Account`] holds the credentials of one Google user and hands out
//! bearer tokens to the request engine. It supports the web-server flow
//! (authorization URL + code exchange), the device flow and refresh tokens.
//!
//! # Example: web-server flow
//!
//! ```rust,ignore
//! use yt::auth::{Account, StateParam};
//! use yt::YtConfig;
//!
//! let config = YtConfig::from_env()?;
//! let account = Account::builder(&config)
//!     .scopes(["youtube", "userinfo.profile"])
//!     .redirect_uri("https://example.com/oauth/callback")
//!     .state(StateParam::new())
//!     .build();
//!
//! // Redirect the user to:
//! let url = account.authentication_url()?;
//!
//! // Then, in the callback handler:
//! let account = Account::builder(&config)
//!     .redirect_uri("https://example.com/oauth/callback")
//!     .authorization_code(code_from_query)
//!     .build();
//! let refresh_token = account.refresh_token().await; // store it
//! ```

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::auth::error::MissingAuthError;
use crate::auth::state::StateParam;
use crate::auth::Authenticator;
use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};
use crate::config::YtConfig;

const TOKEN_PATH: &str = "/o/oauth2/token";
const DEVICE_CODE_PATH: &str = "/o/oauth2/device/code";
const AUTH_PATH: &str = "/o/oauth2/auth";

const DEVICE_GRANT_TYPE: &str = "http://oauth.net/grant_type/device/1.0";

/// Prefix prepended to short scope names such as `youtube`.
pub const SCOPE_PREFIX: &str = "https://www.googleapis.com/auth/";

/// Scopes requested when none are given.
pub const DEFAULT_SCOPES: &[&str] = &["youtube"];

/// A code the user enters on a second screen to authorize a device.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DeviceCode {
    /// Opaque code exchanged for tokens once the user has approved.
    pub device_code: String,
    /// The code shown to the user.
    pub user_code: String,
    /// Where the user enters [`user_code`](Self::user_code).
    #[serde(alias = "verification_uri")]
    pub verification_url: String,
    /// Seconds until the codes expire.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Minimum seconds between polls.
    #[serde(default)]
    pub interval: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Default)]
struct TokenState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    authorization_code: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    device_code: Option<DeviceCode>,
}

impl TokenState {
    fn usable_access_token(&self) -> Option<&str> {
        let expired = self.expires_at.is_some_and(|expires| Utc::now() >= expires);
        self.access_token.as_deref().filter(|_| !expired)
    }

    fn store(&mut self, response: AccessTokenResponse) {
        self.access_token = Some(response.access_token);
        if let Some(refresh_token) = response.refresh_token {
            self.refresh_token = Some(refresh_token);
        }
        self.expires_at = response
            .expires_in
            .map(|seconds| Utc::now() + Duration::seconds(seconds));
    }
}

impl fmt::Debug for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |value: &Option<String>| value.as_ref().map(|_| "*****");
        f.debug_struct("TokenState")
            .field("access_token", &mask(&self.access_token))
            .field("refresh_token", &mask(&self.refresh_token))
            .field("authorization_code", &mask(&self.authorization_code))
            .field("expires_at", &self.expires_at)
            .field("device_code", &self.device_code.as_ref().map(|c| &c.user_code))
            .finish()
    }
}

/// A Google account authorized through OAuth 2.0.
///
/// Token state lives behind an async mutex, so one `Account` can be shared
/// (in an `Arc`) by every request of a client; refreshing updates it in
/// place.
#[derive(Debug)]
pub struct Account {
    http: HttpClient,
    config: YtConfig,
    scopes: Vec<String>,
    redirect_uri: Option<String>,
    state: Option<StateParam>,
    device: bool,
    tokens: Mutex<TokenState>,
}

// Verify Account is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Account>();
};

impl Account {
    /// Creates a new builder for an account using `config`.
    #[must_use]
    pub fn builder(config: &YtConfig) -> AccountBuilder {
        AccountBuilder::new(config)
    }

    /// Returns the full scope URLs this account requests.
    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Returns the state sent with the authorization URL, if any.
    #[must_use]
    pub const fn state(&self) -> Option<&StateParam> {
        self.state.as_ref()
    }

    /// Returns the refresh token, if one has been obtained.
    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens.lock().await.refresh_token.clone()
    }

    /// Returns when the current access token expires, if known.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.tokens.lock().await.expires_at
    }

    /// Builds the URL where the user grants this account access.
    ///
    /// # Errors
    ///
    /// Returns [`MissingAuthError::NoCredentials`] if the client ID or the
    /// redirect URI is not configured.
    pub fn authentication_url(&self) -> Result<String, MissingAuthError> {
        let client_id = self
            .config
            .client_id()
            .ok_or_else(|| no_credentials("client_id is not configured"))?;
        let redirect_uri = self
            .redirect_uri
            .as_deref()
            .ok_or_else(|| no_credentials("redirect_uri is not configured"))?;

        let raw = format!("{}{AUTH_PATH}", self.config.oauth_host());
        let mut url = reqwest::Url::parse(&raw)
            .map_err(|e| no_credentials(&format!("invalid OAuth host '{raw}': {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", client_id.as_ref())
                .append_pair("redirect_uri", redirect_uri)
                .append_pair("scope", &self.scopes.join(" "))
                .append_pair("response_type", "code")
                .append_pair("access_type", "offline")
                .append_pair("prompt", "consent");
            if let Some(state) = &self.state {
                query.append_pair("state", state.as_ref());
            }
        }
        Ok(url.to_string())
    }

    /// Requests a device code for the device flow and remembers it for polling.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the client ID is missing or the request fails.
    pub async fn request_device_code(&self) -> Result<DeviceCode, HttpError> {
        let mut tokens = self.tokens.lock().await;
        let code = self.fetch_device_code().await?;
        tokens.device_code = Some(code.clone());
        Ok(code)
    }

    async fn fetch_device_code(&self) -> Result<DeviceCode, HttpError> {
        let client_id = self
            .config
            .client_id()
            .ok_or_else(|| no_credentials("client_id is not configured"))?;

        let request = self
            .oauth_request(DEVICE_CODE_PATH)
            .form_body([
                ("client_id", client_id.as_ref().to_string()),
                ("scope", self.scopes.join(" ")),
            ])
            .build()?;
        let response = self.http.request(&request).await?;
        decode(&response)
    }

    async fn exchange_code(&self, code: &str) -> Result<AccessTokenResponse, HttpError> {
        let redirect_uri = self
            .redirect_uri
            .clone()
            .ok_or_else(|| no_credentials("redirect_uri is not configured"))?;
        self.token_request(vec![
            ("grant_type", "authorization_code".to_string()),
            ("code", code.to_string()),
            ("redirect_uri", redirect_uri),
        ])
        .await
    }

    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<AccessTokenResponse, HttpError> {
        self.token_request(vec![
            ("grant_type", "refresh_token".to_string()),
            ("refresh_token", refresh_token.to_string()),
        ])
        .await
    }

    async fn poll_device_code(&self, code: &DeviceCode) -> Result<AccessTokenResponse, HttpError> {
        let result = self
            .token_request(vec![
                ("grant_type", DEVICE_GRANT_TYPE.to_string()),
                ("code", code.device_code.clone()),
            ])
            .await;

        match result {
            Err(HttpError::Request(error))
                if matches!(
                    error.body().get("error").and_then(serde_json::Value::as_str),
                    Some("authorization_pending" | "slow_down")
                ) =>
            {
                Err(MissingAuthError::AuthorizationPending {
                    user_code: code.user_code.clone(),
                    verification_url: code.verification_url.clone(),
                }
                .into())
            }
            other => other,
        }
    }

    async fn token_request(
        &self,
        params: Vec<(&str, String)>,
    ) -> Result<AccessTokenResponse, HttpError> {
        let (client_id, client_secret) = self
            .config
            .client_credentials()
            .map_err(|e| no_credentials(&e.to_string()))?;

        let mut form = vec![
            ("client_id", client_id.as_ref().to_string()),
            ("client_secret", client_secret.as_ref().to_string()),
        ];
        form.extend(params);

        let request = self.oauth_request(TOKEN_PATH).form_body(form).build()?;
        match self.http.request(&request).await {
            Ok(response) => decode(&response),
            Err(HttpError::Request(error))
                if error.body().get("error").and_then(serde_json::Value::as_str)
                    == Some("invalid_grant") =>
            {
                let reason = error
                    .body()
                    .get("error_description")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("invalid_grant")
                    .to_string();
                Err(MissingAuthError::InvalidGrant { reason }.into())
            }
            Err(other) => Err(other),
        }
    }

    fn oauth_request(&self, path: &str) -> crate::clients::HttpRequestBuilder {
        HttpRequest::builder(HttpMethod::Post, path).host(self.config.oauth_host())
    }

    fn authorization_required(&self) -> MissingAuthError {
        match self.authentication_url() {
            Ok(authentication_url) => MissingAuthError::AuthorizationRequired { authentication_url },
            Err(error) => error,
        }
    }
}

#[async_trait::async_trait]
impl Authenticator for Account {
    async fn access_token(&self) -> Result<String, HttpError> {
        let mut tokens = self.tokens.lock().await;
        if let Some(token) = tokens.usable_access_token() {
            return Ok(token.to_string());
        }

        let response = if let Some(code) = tokens.authorization_code.take() {
            self.exchange_code(&code).await?
        } else if let Some(refresh_token) = tokens.refresh_token.clone() {
            self.exchange_refresh_token(&refresh_token).await?
        } else if self.device {
            let code = match tokens.device_code.clone() {
                Some(code) => code,
                None => {
                    let code = self.fetch_device_code().await?;
                    tokens.device_code = Some(code.clone());
                    code
                }
            };
            let response = self.poll_device_code(&code).await?;
            tokens.device_code = None;
            response
        } else {
            return Err(self.authorization_required().into());
        };

        tracing::debug!("Obtained a new access token");
        tokens.store(response);
        tokens
            .access_token
            .clone()
            .ok_or_else(|| self.authorization_required().into())
    }

    async fn refresh_access_token(&self) -> Result<bool, HttpError> {
        let mut tokens = self.tokens.lock().await;
        let Some(refresh_token) = tokens.refresh_token.clone() else {
            tracing::debug!("No refresh token available");
            return Ok(false);
        };

        let response = self.exchange_refresh_token(&refresh_token).await?;
        tokens.store(response);
        tracing::debug!("Refreshed the access token");
        Ok(true)
    }
}

/// Builder for [`Account`].
#[derive(Debug)]
pub struct AccountBuilder {
    config: YtConfig,
    scopes: Vec<String>,
    redirect_uri: Option<String>,
    state: Option<StateParam>,
    device: bool,
    tokens: TokenState,
}

impl AccountBuilder {
    fn new(config: &YtConfig) -> Self {
        Self {
            config: config.clone(),
            scopes: DEFAULT_SCOPES.iter().map(|s| expand_scope(s)).collect(),
            redirect_uri: None,
            state: None,
            device: false,
            tokens: TokenState::default(),
        }
    }

    /// Replaces the requested scopes. Short names get the Google prefix.
    #[must_use]
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.scopes = scopes.into_iter().map(|s| expand_scope(s.as_ref())).collect();
        self
    }

    /// Sets the redirect URI registered for the web-server flow.
    #[must_use]
    pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Sets the state sent with the authorization URL.
    #[must_use]
    pub fn state(mut self, state: StateParam) -> Self {
        self.state = Some(state);
        self
    }

    /// Sets an authorization code to exchange on first use.
    #[must_use]
    pub fn authorization_code(mut self, code: impl Into<String>) -> Self {
        self.tokens.authorization_code = Some(code.into());
        self
    }

    /// Sets a previously obtained refresh token.
    #[must_use]
    pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
        self.tokens.refresh_token = Some(token.into());
        self
    }

    /// Sets a previously obtained access token.
    #[must_use]
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.tokens.access_token = Some(token.into());
        self
    }

    /// Sets when the access token expires.
    #[must_use]
    pub const fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.tokens.expires_at = Some(expires_at);
        self
    }

    /// Uses the device flow when no other credential is available.
    #[must_use]
    pub const fn device(mut self, device: bool) -> Self {
        self.device = device;
        self
    }

    /// Builds the [`Account`].
    #[must_use]
    pub fn build(self) -> Account {
        Account {
            http: HttpClient::new(&self.config),
            config: self.config,
            scopes: self.scopes,
            redirect_uri: self.redirect_uri,
            state: self.state,
            device: self.device,
            tokens: Mutex::new(self.tokens),
        }
    }
}

fn expand_scope(scope: &str) -> String {
    if scope.starts_with("https://") {
        scope.to_string()
    } else {
        format!("{SCOPE_PREFIX}{scope}")
    }
}

fn no_credentials(reason: &str) -> MissingAuthError {
    MissingAuthError::NoCredentials {
        reason: reason.to_string(),
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> Result<T, HttpError> {
    serde_json::from_value(response.body.clone()).map_err(|e| {
        no_credentials(&format!("unexpected response from the authorization server: {e}")).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientId, ClientSecret, HostUrl};

    fn config() -> YtConfig {
        YtConfig::builder()
            .client_id(ClientId::new("client-123").unwrap())
            .client_secret(ClientSecret::new("s3cret").unwrap())
            .oauth_host(HostUrl::new("https://accounts.example.com").unwrap())
            .build()
    }

    #[test]
    fn test_scopes_are_expanded() {
        let account = Account::builder(&config())
            .scopes(["youtube.readonly", "https://www.googleapis.com/auth/yt-analytics.readonly"])
            .build();

        assert_eq!(
            account.scopes(),
            [
                "https://www.googleapis.com/auth/youtube.readonly".to_string(),
                "https://www.googleapis.com/auth/yt-analytics.readonly".to_string(),
            ]
        );
    }

    #[test]
    fn test_default_scope_is_youtube() {
        let account = Account::builder(&config()).build();
        assert_eq!(account.scopes(), ["https://www.googleapis.com/auth/youtube".to_string()]);
    }

    #[test]
    fn test_authentication_url_contains_offline_access_and_state() {
        let account = Account::builder(&config())
            .redirect_uri("https://example.com/cb")
            .state(StateParam::from_raw("xyz"))
            .build();

        let url = reqwest::Url::parse(&account.authentication_url().unwrap()).unwrap();
        assert_eq!(url.host_str(), Some("accounts.example.com"));
        assert_eq!(url.path(), "/o/oauth2/auth");

        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["client_id"], "client-123");
        assert_eq!(pairs["redirect_uri"], "https://example.com/cb");
        assert_eq!(pairs["access_type"], "offline");
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(pairs["state"], "xyz");
        assert_eq!(pairs["scope"], "https://www.googleapis.com/auth/youtube");
    }

    #[test]
    fn test_authentication_url_requires_redirect_uri() {
        let account = Account::builder(&config()).build();
        assert!(matches!(
            account.authentication_url(),
            Err(MissingAuthError::NoCredentials { .. })
        ));
    }

    #[tokio::test]
    async fn test_unexpired_access_token_is_returned_without_requests() {
        let account = Account::builder(&YtConfig::default())
            .access_token("ya29.cached")
            .expires_at(Utc::now() + Duration::hours(1))
            .build();

        assert_eq!(account.access_token().await.unwrap(), "ya29.cached");
    }

    #[tokio::test]
    async fn test_no_credentials_requires_authorization() {
        let account = Account::builder(&config())
            .redirect_uri("https://example.com/cb")
            .build();

        let error = account.access_token().await.unwrap_err();
        assert!(matches!(
            error,
            HttpError::MissingAuth(MissingAuthError::AuthorizationRequired { .. })
        ));
    }

    #[test]
    fn test_refresh_without_refresh_token_returns_false() {
        let account = Account::builder(&config()).access_token("ya29.old").build();
        let refreshed = tokio_test::block_on(account.refresh_access_token());
        assert!(!tokio_test::assert_ok!(refreshed));
    }

    #[test]
    fn test_debug_masks_tokens() {
        let account = Account::builder(&config())
            .access_token("ya29.visible")
            .refresh_token("1//refresh")
            .build();

        let debug = format!("{account:?}");
        assert!(!debug.contains("ya29.visible"));
        assert!(!debug.contains("1//refresh"));
        assert!(!debug.contains("s3cret"));
    }
}
