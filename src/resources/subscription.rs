use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::resources::{ResourceId, Thumbnails};

/// A user's subscription to a channel.
///
/// See: <https://developers.google.com/youtube/v3/docs/subscriptions#resource>
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// The subscription ID, needed to unsubscribe.
    pub id: String,
    #[serde(default)]
    pub snippet: Option<SubscriptionSnippet>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSnippet {
    /// The title of the subscribed channel.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// The subscriber's channel.
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub resource_id: ResourceId,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

impl Subscription {
    #[must_use]
    pub fn title(&self) -> &str {
        self.snippet.as_ref().map_or("", |s| s.title.as_str())
    }

    /// Returns the ID of the channel subscribed to.
    #[must_use]
    pub fn subscribed_channel_id(&self) -> Option<&str> {
        self.snippet
            .as_ref()
            .and_then(|s| s.resource_id.channel_id.as_deref())
    }
}
