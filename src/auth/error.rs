//! Authentication error types.
//!
//! # Example
//!
//! ```rust
//! use yt::auth::MissingAuthError;
//!
//! let error = MissingAuthError::AuthorizationPending {
//!     user_code: "ABCD-EFGH".to_string(),
//!     verification_url: "https://www.google.com/device".to_string(),
//! };
//! assert!(error.to_string().contains("ABCD-EFGH"));
//! ```

use thiserror::Error;

/// No usable credentials are available to authenticate a request.
///
/// Variants carry what the user needs to grant access, when it is known.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MissingAuthError {
    /// The account has no token and no authorization code to exchange.
    #[error("Authorization is required. Visit {authentication_url} to grant access.")]
    AuthorizationRequired {
        /// The URL where the user can grant access.
        authentication_url: String,
    },

    /// The device flow is waiting for the user to enter the code.
    #[error("Enter the code {user_code} at {verification_url} to grant access.")]
    AuthorizationPending {
        /// The code to enter.
        user_code: String,
        /// The URL where the code is entered.
        verification_url: String,
    },

    /// The authorization code or refresh token was rejected.
    #[error("The grant was rejected by the authorization server: {reason}")]
    InvalidGrant {
        /// The `error_description` reported by the server, or the error code.
        reason: String,
    },

    /// The account cannot obtain a token at all.
    #[error("No credentials available: {reason}")]
    NoCredentials {
        /// What is missing.
        reason: String,
    },
}

// Verify MissingAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MissingAuthError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_required_includes_url() {
        let error = MissingAuthError::AuthorizationRequired {
            authentication_url: "https://accounts.google.com/o/oauth2/auth?x=1".to_string(),
        };
        assert!(error
            .to_string()
            .contains("https://accounts.google.com/o/oauth2/auth?x=1"));
    }

    #[test]
    fn test_invalid_grant_includes_reason() {
        let error = MissingAuthError::InvalidGrant {
            reason: "Token has been expired or revoked.".to_string(),
        };
        assert!(error.to_string().contains("expired or revoked"));
    }
}
