//! YouTube content owners (partner accounts).

use async_trait::async_trait;

use crate::auth::account::Account;
use crate::auth::Authenticator;
use crate::clients::HttpError;

/// Scopes a content owner needs to act on behalf of its channels.
pub const CONTENT_OWNER_SCOPES: &[&str] = &["youtube", "youtubepartner"];

/// A content owner acting through an authorized [`Account`].
///
/// Every request made with a content owner carries
/// `onBehalfOfContentOwner=<owner name>`.
///
/// # Example
///
/// ```rust,ignore
/// use yt::auth::{Account, ContentOwner, CONTENT_OWNER_SCOPES};
///
/// let account = Account::builder(&config)
///     .scopes(CONTENT_OWNER_SCOPES)
///     .refresh_token(stored_refresh_token)
///     .build();
/// let owner = ContentOwner::new("BlackBoxMusic", account);
/// ```
#[derive(Debug)]
pub struct ContentOwner {
    owner_name: String,
    account: Account,
}

impl ContentOwner {
    /// Creates a content owner named `owner_name` authorized by `account`.
    #[must_use]
    pub fn new(owner_name: impl Into<String>, account: Account) -> Self {
        Self {
            owner_name: owner_name.into(),
            account,
        }
    }

    /// Returns the content owner's name.
    #[must_use]
    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    /// Returns the underlying account.
    #[must_use]
    pub const fn account(&self) -> &Account {
        &self.account
    }
}

#[async_trait]
impl Authenticator for ContentOwner {
    async fn access_token(&self) -> Result<String, HttpError> {
        self.account.access_token().await
    }

    async fn refresh_access_token(&self) -> Result<bool, HttpError> {
        self.account.refresh_access_token().await
    }

    fn on_behalf_of_content_owner(&self) -> Option<&str> {
        Some(&self.owner_name)
    }
}
