//! Classification of failed attempts into [`ErrorKind`]s.
//!
//! Precedence: transient transport failures and 5xx responses are server
//! errors, then 401, then 403, and everything else is a generic request error.

use crate::clients::errors::ErrorKind;

/// Classifies a response whose status did not match the expected class.
#[must_use]
pub const fn classify_status(code: u16) -> ErrorKind {
    match code {
        500..=599 => ErrorKind::ServerError,
        401 => ErrorKind::Unauthorized,
        403 => ErrorKind::Forbidden,
        _ => ErrorKind::RequestError,
    }
}

/// Classifies a request that failed before a complete response was read.
///
/// Timeouts, connection failures (including TLS handshakes) and interrupted
/// bodies are transient and count as server errors.
#[must_use]
pub fn classify_transport(error: &reqwest::Error) -> ErrorKind {
    if error.is_timeout() || error.is_connect() || error.is_request() || error.is_body() {
        ErrorKind::ServerError
    } else {
        ErrorKind::RequestError
    }
}
