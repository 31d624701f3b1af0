//! State parameter handling for OAuth CSRF protection.
//!
//! The `state` sent with the authorization URL comes back unchanged on the
//! redirect; comparing the two guards against forged callbacks.
//!
//! # Example
//!
//! ```rust
//! use yt::auth::StateParam;
//!
//! let state = StateParam::new();
//! assert_eq!(state.as_ref().len(), 15);
//! assert!(state.verify(state.as_ref()));
//! ```

use std::fmt;

use rand::distributions::Alphanumeric;
use rand::Rng;

/// OAuth state parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateParam {
    value: String,
}

// Verify StateParam is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StateParam>();
};

impl StateParam {
    const NONCE_LENGTH: usize = 15;

    /// Creates a state parameter holding a random 15-character alphanumeric nonce.
    #[must_use]
    pub fn new() -> Self {
        let value: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::NONCE_LENGTH)
            .map(char::from)
            .collect();

        Self { value }
    }

    /// Wraps an arbitrary string, e.g. one the application round-trips itself.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self { value: raw.into() }
    }

    /// Returns `true` if `received` equals this state.
    #[must_use]
    pub fn verify(&self, received: &str) -> bool {
        self.value == received
    }
}

impl Default for StateParam {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<str> for StateParam {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for StateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generates_alphanumeric_nonce() {
        let state = StateParam::new();
        assert_eq!(state.as_ref().len(), 15);
        assert!(state.as_ref().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_new_generates_distinct_values() {
        assert_ne!(StateParam::new(), StateParam::new());
    }

    #[test]
    fn test_from_raw_and_verify() {
        let state = StateParam::from_raw("return-to-dashboard");
        assert_eq!(state.to_string(), "return-to-dashboard");
        assert!(state.verify("return-to-dashboard"));
        assert!(!state.verify("forged"));
    }
}
