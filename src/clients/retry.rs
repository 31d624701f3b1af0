//! Retry decisions for failed requests.
//!
//! A failed attempt is retried, in this order of precedence, when:
//!
//! 1. it is [`ErrorKind::Unauthorized`], the request has an authenticator and
//!    the token can be refreshed (at most once per request);
//! 2. it is [`ErrorKind::ServerError`] (at most [`RetryPolicy::max_retries`]
//!    times);
//! 3. it is [`ErrorKind::Forbidden`] and the body reports an exceeded quota
//!    (a separate budget of the same size).
//!
//! Retry *i* (counting from 0) of causes 2 and 3 waits
//! `initial_delay + i × delay_step`, which is 3s, 13s and 23s by default.

use std::time::Duration;

use crate::clients::errors::{ErrorKind, RequestError};

/// How many times one request may refresh its token.
///
/// The limit covers the whole request, not each 401 it receives.
pub const MAX_TOKEN_REFRESHES: u32 = 1;

/// Bounds and backoff schedule for retrying transient failures.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use yt::clients::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.delay_for(0), Duration::from_secs(3));
/// assert_eq!(policy.delay_for(1), Duration::from_secs(13));
/// assert_eq!(policy.delay_for(2), Duration::from_secs(23));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_delay: Duration,
    delay_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(3),
            delay_step: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with a custom bound and schedule.
    #[must_use]
    pub const fn new(max_retries: u32, initial_delay: Duration, delay_step: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            delay_step,
        }
    }

    /// Returns the maximum number of retries per cause.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the wait before retry number `attempt_index` (0-based).
    #[must_use]
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        self.initial_delay + self.delay_step * attempt_index
    }
}

/// Why a request is being retried after a delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryCause {
    /// A server error or transient network failure.
    ServerError,
    /// A forbidden response reporting an exceeded quota.
    QuotaExceeded,
}

/// What to do after a failed attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Refresh the access token, then resend.
    RefreshToken,
    /// Wait `delay`, then resend.
    Backoff {
        /// The cause whose budget was charged.
        cause: RetryCause,
        /// How long to wait.
        delay: Duration,
    },
    /// Return the error to the caller.
    GiveUp,
}

/// Per-request retry bookkeeping; each cause has its own budget.
///
/// A request refreshes its token at most [`MAX_TOKEN_REFRESHES`] times in
/// total. A later 401 gives up even after other retries in between.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RetryState {
    token_refreshes: u32,
    server_error_retries: u32,
    quota_retries: u32,
}

impl RetryState {
    /// Decides whether to retry after `error`, charging the matching budget.
    pub fn decide(
        &mut self,
        policy: &RetryPolicy,
        error: &RequestError,
        has_authenticator: bool,
    ) -> RetryDecision {
        match error.kind() {
            ErrorKind::Unauthorized
                if has_authenticator && self.token_refreshes < MAX_TOKEN_REFRESHES =>
            {
                self.token_refreshes += 1;
                RetryDecision::RefreshToken
            }
            ErrorKind::ServerError => {
                Self::charge(&mut self.server_error_retries, policy, RetryCause::ServerError)
            }
            ErrorKind::Forbidden if error.is_quota_exceeded() => {
                Self::charge(&mut self.quota_retries, policy, RetryCause::QuotaExceeded)
            }
            _ => RetryDecision::GiveUp,
        }
    }

    fn charge(used: &mut u32, policy: &RetryPolicy, cause: RetryCause) -> RetryDecision {
        if *used >= policy.max_retries {
            return RetryDecision::GiveUp;
        }
        let delay = policy.delay_for(*used);
        *used += 1;
        RetryDecision::Backoff { cause, delay }
    }
}
