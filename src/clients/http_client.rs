//! HTTP client for YouTube API communication.
//!
//! This module provides the [`HttpClient`] type, which performs one round
//! trip per [`HttpClient::send`] call and wraps it in the retry loop of
//! [`HttpClient::request`].

use std::collections::HashMap;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT};

use crate::clients::classify::{classify_status, classify_transport};
use crate::clients::errors::{HttpError, RequestError};
use crate::clients::http_request::{HttpRequest, RequestBody};
use crate::clients::http_response::HttpResponse;
use crate::clients::retry::{RetryDecision, RetryPolicy, RetryState};
use crate::config::YtConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the YouTube API and OAuth endpoints.
///
/// The client handles:
/// - URL construction from the request descriptor, including the API key
/// - The User-Agent header and the bearer token of the request's authenticator
/// - Classification of unexpected statuses and transport failures
/// - Token refresh on 401 and backoff on server errors and exceeded quotas
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use yt::{HttpClient, HttpMethod, HttpRequest, YtConfig};
///
/// let client = HttpClient::new(&YtConfig::default());
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/youtube/v3/videos")
///     .query_param("id", "dQw4w9WgXcQ")
///     .query_param("part", "snippet")
///     .build()
///     .unwrap();
///
/// let response = client.request(&request).await?;
/// println!("{}", response.body["items"][0]["snippet"]["title"]);
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    user_agent: String,
    debug: bool,
    retry_policy: RetryPolicy,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    #[must_use]
    pub fn new(config: &YtConfig) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!("{user_agent_prefix}yt-rust v{SDK_VERSION} | Rust {rust_version}");

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .unwrap_or_default();

        Self {
            client,
            user_agent,
            debug: config.debug(),
            retry_policy: *config.retry_policy(),
        }
    }

    /// Returns the User-Agent sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns `true` if errors include the request and response body.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Returns the retry policy applied by [`request`](Self::request).
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Sends a request, retrying transient failures.
    ///
    /// Each attempt asks the request's authenticator for a fresh token. A 401
    /// triggers at most one token refresh; server errors and exceeded quotas
    /// are retried per the [`RetryPolicy`], each with its own budget. When no
    /// retry applies, the last error is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - request validation fails (`InvalidRequest`)
    /// - the authenticator has no usable credentials (`MissingAuth`)
    /// - the last attempt failed (`Request`)
    pub async fn request(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let mut state = RetryState::default();
        loop {
            let access_token = match &request.auth {
                Some(auth) => Some(auth.access_token().await?),
                None => None,
            };

            let error = match self.send(request, access_token.as_deref()).await {
                Ok(response) => return Ok(response),
                Err(HttpError::Request(error)) => error,
                Err(other) => return Err(other),
            };

            match state.decide(&self.retry_policy, &error, request.auth.is_some()) {
                RetryDecision::RefreshToken => {
                    let Some(auth) = &request.auth else {
                        return Err(error.into());
                    };
                    match auth.refresh_access_token().await {
                        Ok(true) => {
                            tracing::debug!(path = %request.path, "Retrying with a refreshed access token");
                        }
                        Ok(false) => return Err(error.into()),
                        Err(refresh_error) => {
                            tracing::warn!(%refresh_error, "Could not refresh the access token");
                            return Err(error.into());
                        }
                    }
                }
                RetryDecision::Backoff { cause, delay } => {
                    tracing::warn!(
                        path = %request.path,
                        ?cause,
                        status = ?error.status(),
                        "Request to the YouTube API failed, retrying in {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::GiveUp => return Err(error.into()),
            }
        }
    }

    /// Performs exactly one round trip, without retries.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Request`] if the status does not match the
    /// request's expected response or no response was received, and
    /// [`HttpError::InvalidRequest`] if the URL cannot be built.
    pub async fn send(
        &self,
        request: &HttpRequest,
        access_token: Option<&str>,
    ) -> Result<HttpResponse, HttpError> {
        let url = request.url()?;
        let curl = request.to_curl(access_token);

        let mut builder = self
            .client
            .request(request.http_method.as_reqwest(), url)
            .header(USER_AGENT, &self.user_agent);

        if let Some(token) = access_token {
            builder = builder.bearer_auth(token);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Form(pairs)) => builder.form(pairs),
            Some(RequestBody::Stream { data, content_type }) => builder
                .header(CONTENT_TYPE, content_type.as_str())
                .header(CONTENT_LENGTH, data.len())
                .body(data.clone()),
            None => builder,
        };

        tracing::debug!(method = %request.http_method, path = %request.path, "Sending request");

        let response = match builder.send().await {
            Ok(response) => response,
            Err(error) => return Err(self.transport_error(error, curl).into()),
        };

        let code = response.status().as_u16();
        let headers = parse_response_headers(response.headers());
        let raw_body = match response.text().await {
            Ok(text) => text,
            Err(error) => return Err(self.transport_error(error, curl).into()),
        };

        tracing::debug!(method = %request.http_method, path = %request.path, code, "Received response");

        if !request.expected_response.matches(code) {
            return Err(
                RequestError::new(classify_status(code), Some(code), raw_body, curl, self.debug)
                    .into(),
            );
        }

        Ok(HttpResponse::new(
            code,
            headers,
            raw_body,
            request.response_format,
        ))
    }

    fn transport_error(&self, error: reqwest::Error, curl: String) -> RequestError {
        let kind = classify_transport(&error);
        // The URL carries the API key.
        let message = error.without_url().to_string();
        tracing::debug!(%message, "Request did not complete");
        RequestError::transport(kind, message, curl, self.debug)
    }
}

/// Parses response headers into a `HashMap` keyed by lower-case name.
fn parse_response_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, Vec<String>> {
    let mut result: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers {
        let key = name.as_str().to_lowercase();
        let value = value.to_str().unwrap_or_default().to_string();
        result.entry(key).or_default().push(value);
    }
    result
}
