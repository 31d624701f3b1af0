//! HTTP-specific error types for the YouTube client.
//!
//! - [`RequestError`]: a classified failed attempt (see [`ErrorKind`])
//! - [`InvalidHttpRequestError`]: a request that failed validation before sending
//! - [`HttpError`]: unified error type returned by the request engine
//!
//! # Example
//!
//! ```rust,ignore
//! use yt::clients::{ErrorKind, HttpError};
//!
//! match client.request(&request).await {
//!     Ok(response) => println!("{}", response.body),
//!     Err(HttpError::Request(e)) if e.kind() == ErrorKind::Forbidden => {
//!         println!("Forbidden: {:?}", e.reasons());
//!     }
//!     Err(HttpError::MissingAuth(e)) => println!("Authorize first: {e}"),
//!     Err(other) => println!("{other}"),
//! }
//! ```

use std::fmt;

use thiserror::Error;

use crate::auth::MissingAuthError;

/// The class a failed attempt is sorted into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A 5xx response or a transient network, TLS or timeout failure.
    ServerError,
    /// A 401 response.
    Unauthorized,
    /// A 403 response.
    Forbidden,
    /// Any other unexpected response, e.g. 400 or 404.
    RequestError,
}

impl ErrorKind {
    const fn description(self) -> &'static str {
        match self {
            Self::ServerError => "A request to the YouTube API caused an unexpected server error",
            Self::Unauthorized => "A request to the YouTube API was sent without a valid authentication",
            Self::Forbidden => "A request to the YouTube API was considered forbidden by the server",
            Self::RequestError => "A request to the YouTube API failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ServerError => "server error",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::RequestError => "request error",
        };
        f.write_str(label)
    }
}

/// A failed request, classified and carrying what is needed to reproduce it.
///
/// The `Display` output never includes the raw body or the curl command
/// unless the error was created with debugging enabled, since both may contain
/// bearer tokens or API keys.
///
/// # Example
///
/// ```rust
/// use yt::clients::{ErrorKind, RequestError};
///
/// let error = RequestError::new(
///     ErrorKind::RequestError,
///     Some(400),
///     r#"{"error":{"errors":[{"reason":"subscriptionDuplicate","message":"dup"}]}}"#,
///     "curl -X POST \"https://www.googleapis.com/youtube/v3/subscriptions\"",
///     false,
/// );
///
/// assert!(error.has_reason("subscriptionDuplicate"));
/// assert!(!error.to_string().contains("curl"));
/// ```
#[derive(Clone)]
pub struct RequestError {
    kind: ErrorKind,
    status: Option<u16>,
    body: serde_json::Value,
    raw_body: String,
    curl: String,
    transport_message: Option<String>,
    debug: bool,
}

impl RequestError {
    /// Creates an error for a response that did not match its expected status.
    ///
    /// The raw body is parsed as JSON when possible.
    #[must_use]
    pub fn new(
        kind: ErrorKind,
        status: Option<u16>,
        raw_body: impl Into<String>,
        curl: impl Into<String>,
        debug: bool,
    ) -> Self {
        let raw_body = raw_body.into();
        let body = serde_json::from_str(&raw_body).unwrap_or(serde_json::Value::Null);
        Self {
            kind,
            status,
            body,
            raw_body,
            curl: curl.into(),
            transport_message: None,
            debug,
        }
    }

    /// Creates an error for a request that never received a response.
    #[must_use]
    pub fn transport(
        kind: ErrorKind,
        message: impl Into<String>,
        curl: impl Into<String>,
        debug: bool,
    ) -> Self {
        Self {
            kind,
            status: None,
            body: serde_json::Value::Null,
            raw_body: String::new(),
            curl: curl.into(),
            transport_message: Some(message.into()),
            debug,
        }
    }

    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the HTTP status, or `None` if no response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the parsed error body (`Null` if it was not JSON).
    #[must_use]
    pub const fn body(&self) -> &serde_json::Value {
        &self.body
    }

    /// Returns the raw response body.
    #[must_use]
    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }

    /// Returns a curl command equivalent to the failed request.
    #[must_use]
    pub fn curl(&self) -> &str {
        &self.curl
    }

    /// Returns the machine-readable reasons listed in `error.errors[].reason`.
    #[must_use]
    pub fn reasons(&self) -> Vec<&str> {
        self.body
            .pointer("/error/errors")
            .and_then(serde_json::Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.get("reason").and_then(serde_json::Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the human-readable messages listed in `error.errors[].message`.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.body
            .pointer("/error/errors")
            .and_then(serde_json::Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(serde_json::Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns `true` if any listed reason equals `reason`.
    #[must_use]
    pub fn has_reason(&self, reason: &str) -> bool {
        self.reasons().contains(&reason)
    }

    /// Returns `true` for a forbidden response caused by an exhausted quota.
    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        self.kind == ErrorKind::Forbidden && self.raw_body.to_lowercase().contains("exceeded")
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.description())?;
        if let Some(status) = self.status {
            write!(f, " (code {status})")?;
        }
        let reasons = self.reasons();
        if !reasons.is_empty() {
            write!(f, ": {}", reasons.join(", "))?;
        }
        if let Some(message) = &self.transport_message {
            write!(f, ": {message}")?;
        }

        if self.debug {
            write!(
                f,
                "\n\nThe request sent to the API is equivalent to:\n\n{}",
                self.curl
            )?;
            if !self.raw_body.is_empty() {
                write!(f, "\n\nThe response body was:\n\n{}", self.raw_body)?;
            }
        } else {
            f.write_str(". Enable the debug flag of YtConfig to see the request and response body.")?;
        }
        Ok(())
    }
}

impl fmt::Debug for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked = |value: &str| if self.debug { value.to_string() } else { "*****".to_string() };
        f.debug_struct("RequestError")
            .field("kind", &self.kind)
            .field("status", &self.status)
            .field("reasons", &self.reasons())
            .field("raw_body", &masked(&self.raw_body))
            .field("curl", &masked(&self.curl))
            .field("transport_message", &self.transport_message)
            .field("debug", &self.debug)
            .finish()
    }
}

impl std::error::Error for RequestError {}

/// Error returned when a request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The host is empty or has no scheme.
    #[error("Invalid host '{host}'. Expected a scheme and authority such as 'https://www.googleapis.com'.")]
    InvalidHost {
        /// The host that was provided.
        host: String,
    },

    /// A GET or DELETE request carries a body.
    #[error("Cannot send a body with {method}.")]
    BodyNotAllowed {
        /// The HTTP method of the request.
        method: String,
    },

    /// The host and path do not form a valid URL.
    #[error("Invalid request URL '{url}'.")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
    },
}

/// Unified error type returned by the request engine.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request failed and could not be recovered by retrying.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// No credentials were available to authenticate the request.
    #[error(transparent)]
    MissingAuth(#[from] MissingAuthError),
}

impl HttpError {
    /// Returns the classified request error, if this is one.
    #[must_use]
    pub const fn as_request_error(&self) -> Option<&RequestError> {
        match self {
            Self::Request(error) => Some(error),
            _ => None,
        }
    }

    /// Returns the kind of the request error, if this is one.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        self.as_request_error().map(RequestError::kind)
    }

    /// Returns `true` if this is a request error listing `reason`.
    #[must_use]
    pub fn has_reason(&self, reason: &str) -> bool {
        self.as_request_error()
            .is_some_and(|error| error.has_reason(reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURL: &str = "curl -X GET -H \"Authorization: Bearer secret-token\" \"https://www.googleapis.com/youtube/v3/videos\"";

    #[test]
    fn test_message_hides_body_and_curl_without_debug() {
        let error = RequestError::new(
            ErrorKind::RequestError,
            Some(400),
            "some secret token",
            CURL,
            false,
        );

        let message = error.to_string();
        assert!(!message.contains("secret"));
        assert!(message.contains("code 400"));
    }

    #[test]
    fn test_debug_output_masks_body_and_curl_without_debug() {
        let error = RequestError::new(
            ErrorKind::Unauthorized,
            Some(401),
            "some secret token",
            "curl -X GET -H \"Authorization: Bearer ya29.SECRET\" \"https://x/?key=AIzaKEY\"",
            false,
        );

        let debug = format!("{error:?}");
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("ya29.SECRET"));
        assert!(!debug.contains("AIzaKEY"));
        assert!(debug.contains("Unauthorized"));
    }

    #[test]
    fn test_debug_output_shows_body_and_curl_with_debug() {
        let error = RequestError::new(ErrorKind::Unauthorized, Some(401), "some secret token", CURL, true);

        let debug = format!("{error:?}");
        assert!(debug.contains("some secret token"));
        assert!(debug.contains("Bearer secret-token"));
    }

    #[test]
    fn test_message_includes_body_and_curl_with_debug() {
        let error = RequestError::new(
            ErrorKind::RequestError,
            Some(400),
            "some secret token",
            CURL,
            true,
        );

        let message = error.to_string();
        assert!(message.contains("some secret token"));
        assert!(message.contains("Bearer secret-token"));
    }

    #[test]
    fn test_reasons_and_messages_are_extracted() {
        let error = RequestError::new(
            ErrorKind::Forbidden,
            Some(403),
            r#"{"error":{"errors":[{"reason":"quotaExceeded","message":"The request cannot be completed because you have exceeded your quota."}]}}"#,
            CURL,
            false,
        );

        assert_eq!(error.reasons(), vec!["quotaExceeded"]);
        assert_eq!(error.messages().len(), 1);
        assert!(error.is_quota_exceeded());
        assert!(error.to_string().contains("quotaExceeded"));
    }

    #[test]
    fn test_quota_detection_requires_forbidden() {
        let error = RequestError::new(ErrorKind::RequestError, Some(400), "Limit EXCEEDED", CURL, false);
        assert!(!error.is_quota_exceeded());

        let error = RequestError::new(ErrorKind::Forbidden, Some(403), "Limit EXCEEDED", CURL, false);
        assert!(error.is_quota_exceeded());

        let error = RequestError::new(ErrorKind::Forbidden, Some(403), "insufficientPermissions", CURL, false);
        assert!(!error.is_quota_exceeded());
    }

    #[test]
    fn test_non_json_body_parses_to_null() {
        let error = RequestError::new(ErrorKind::ServerError, Some(503), "<html>", CURL, false);
        assert!(error.body().is_null());
        assert!(error.reasons().is_empty());
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let error = RequestError::transport(ErrorKind::ServerError, "connection refused", CURL, false);
        assert_eq!(error.status(), None);
        assert!(error.to_string().contains("connection refused"));
    }

    #[test]
    fn test_http_error_helpers() {
        let error: HttpError = RequestError::new(
            ErrorKind::RequestError,
            Some(400),
            r#"{"error":{"errors":[{"reason":"subscriptionDuplicate"}]}}"#,
            CURL,
            false,
        )
        .into();

        assert_eq!(error.kind(), Some(ErrorKind::RequestError));
        assert!(error.has_reason("subscriptionDuplicate"));
        assert!(!error.has_reason("playlistNotFound"));
    }

    #[test]
    fn test_invalid_request_error_messages() {
        let error = InvalidHttpRequestError::BodyNotAllowed {
            method: "GET".to_string(),
        };
        assert_eq!(error.to_string(), "Cannot send a body with GET.");
    }
}
