//! Resource-level error type.

use thiserror::Error;

use crate::auth::MissingAuthError;
use crate::clients::{ErrorKind, HttpError, InvalidHttpRequestError};
use crate::youtube_url::UrlError;

/// Errors returned by [`YouTubeClient`](super::YouTubeClient) and
/// [`Collection`](crate::collections::Collection) operations.
///
/// # Example
///
/// ```rust,ignore
/// use yt::{ApiError, ErrorKind};
///
/// match client.video("dQw4w9WgXcQ").await {
///     Ok(video) => println!("{}", video.title()),
///     Err(ApiError::NotFound { .. }) => println!("No such video"),
///     Err(e) if e.kind() == Some(ErrorKind::Forbidden) => println!("Quota? {e}"),
///     Err(e) => return Err(e.into()),
/// }
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A response did not have the expected shape.
    #[error("Unexpected response from the YouTube API: {0}")]
    Decode(#[from] serde_json::Error),

    /// A lookup by ID returned no item.
    #[error("{resource} '{id}' was not found")]
    NotFound {
        /// The kind of resource, e.g. `video`.
        resource: &'static str,
        /// The ID or name looked up.
        id: String,
    },

    /// A URL could not be resolved to a resource.
    #[error(transparent)]
    InvalidUrl(#[from] UrlError),

    /// The upload session was created without a `Location` to send bytes to.
    #[error("The resumable upload session did not return a valid Location header")]
    MissingUploadLocation,
}

impl From<InvalidHttpRequestError> for ApiError {
    fn from(error: InvalidHttpRequestError) -> Self {
        Self::Http(error.into())
    }
}

impl From<MissingAuthError> for ApiError {
    fn from(error: MissingAuthError) -> Self {
        Self::Http(error.into())
    }
}

impl ApiError {
    /// Returns the kind of the underlying request error, if this is one.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Http(error) => error.kind(),
            _ => None,
        }
    }

    /// Returns `true` if this is a request error listing `reason`.
    #[must_use]
    pub fn has_reason(&self, reason: &str) -> bool {
        matches!(self, Self::Http(error) if error.has_reason(reason))
    }
}

// Verify ApiError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let error = ApiError::NotFound {
            resource: "video",
            id: "abc".to_string(),
        };
        assert_eq!(error.to_string(), "video 'abc' was not found");
        assert_eq!(error.kind(), None);
    }

    #[test]
    fn test_invalid_request_converts_to_http() {
        let error: ApiError = InvalidHttpRequestError::InvalidHost {
            host: "nowhere".to_string(),
        }
        .into();
        assert!(matches!(error, ApiError::Http(HttpError::InvalidRequest(_))));
    }
}
