//! HTTP client types for YouTube API communication.
//!
//! This module provides the request engine: request descriptors, the
//! transport, error classification and the retry loop. The resource-level
//! client lives in [`youtube`].
//!
//! # Overview
//!
//! - [`HttpClient`]: the async HTTP client ([`HttpClient::send`] for one round
//!   trip, [`HttpClient::request`] with retries)
//! - [`HttpRequest`]: an immutable request descriptor
//! - [`HttpResponse`]: a decoded response
//! - [`RequestError`] / [`ErrorKind`]: a classified failed attempt
//! - [`RetryPolicy`]: the retry bound and backoff schedule
//! - [`youtube::YouTubeClient`]: resource operations on channels, videos,
//!   playlists, subscriptions and comments
//!
//! # Retry Behavior
//!
//! - **401**: the authenticator refreshes its token once, then the request is resent
//! - **5xx and network failures**: up to 3 retries after 3s, 13s and 23s
//! - **403 with an exceeded quota**: same schedule, separate budget
//! - **Anything else**: returned immediately
//!
//! # Example
//!
//! ```rust,ignore
//! use yt::clients::{HttpClient, HttpMethod, HttpRequest};
//! use yt::YtConfig;
//!
//! let config = YtConfig::from_env()?;
//! let client = HttpClient::new(&config);
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/youtube/v3/channels")
//!     .query_param("id", "UCxO1tY8h1AhOz0T4ENwmpow")
//!     .query_param("part", "snippet")
//!     .api_key(config.api_key().cloned())
//!     .build()?;
//!
//! let response = client.request(&request).await?;
//! ```

mod classify;
mod errors;
mod http_client;
mod http_request;
mod http_response;
mod retry;
pub mod youtube;

pub use classify::{classify_status, classify_transport};
pub use errors::{ErrorKind, HttpError, InvalidHttpRequestError, RequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{
    camelize_key, ExpectedResponse, HttpMethod, HttpRequest, HttpRequestBuilder, QueryValue,
    RequestBody, ResponseFormat,
};
pub use http_response::{xml_to_value, HttpResponse};
pub use retry::{RetryCause, RetryDecision, RetryPolicy, RetryState, MAX_TOKEN_REFRESHES};
pub use youtube::{ApiError, YouTubeClient};
