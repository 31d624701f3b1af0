use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::resources::{count, Thumbnails};

/// A YouTube channel.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels#resource>
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// The channel ID, e.g. `UCxO1tY8h1AhOz0T4ENwmpow`.
    pub id: String,
    #[serde(default)]
    pub snippet: Option<ChannelSnippet>,
    #[serde(default)]
    pub statistics: Option<ChannelStatistics>,
    #[serde(default)]
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// The channel's `@handle` or legacy custom URL.
    #[serde(default)]
    pub custom_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    #[serde(default, deserialize_with = "count::deserialize")]
    pub view_count: Option<u64>,
    /// `None` when the owner hides it.
    #[serde(default, deserialize_with = "count::deserialize")]
    pub subscriber_count: Option<u64>,
    #[serde(default, deserialize_with = "count::deserialize")]
    pub video_count: Option<u64>,
    #[serde(default)]
    pub hidden_subscriber_count: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    #[serde(default)]
    pub related_playlists: RelatedPlaylists,
}

/// Playlists YouTube maintains for every channel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RelatedPlaylists {
    /// The playlist of the channel's uploaded videos.
    #[serde(default)]
    pub uploads: Option<String>,
    #[serde(default)]
    pub likes: Option<String>,
}

impl Channel {
    /// Returns the title, or `""` if the snippet was not requested.
    #[must_use]
    pub fn title(&self) -> &str {
        self.snippet.as_ref().map_or("", |s| s.title.as_str())
    }

    #[must_use]
    pub fn description(&self) -> &str {
        self.snippet.as_ref().map_or("", |s| s.description.as_str())
    }

    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.snippet.as_ref().and_then(|s| s.thumbnails.best_url())
    }

    #[must_use]
    pub fn subscriber_count(&self) -> Option<u64> {
        self.statistics.as_ref().and_then(|s| s.subscriber_count)
    }

    #[must_use]
    pub fn video_count(&self) -> Option<u64> {
        self.statistics.as_ref().and_then(|s| s.video_count)
    }

    #[must_use]
    pub fn view_count(&self) -> Option<u64> {
        self.statistics.as_ref().and_then(|s| s.view_count)
    }

    /// Returns the ID of the playlist holding the channel's uploads.
    #[must_use]
    pub fn uploads_playlist_id(&self) -> Option<&str> {
        self.content_details
            .as_ref()
            .and_then(|d| d.related_playlists.uploads.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_from_api_item() {
        let channel: Channel = serde_json::from_value(json!({
            "kind": "youtube#channel",
            "id": "UCxO1tY8h1AhOz0T4ENwmpow",
            "snippet": {
                "title": "Fullscreen",
                "description": "Fullscreen is a media company.",
                "customUrl": "@fullscreen",
                "publishedAt": "2011-03-09T22:07:07Z",
                "thumbnails": {"default": {"url": "https://yt3.ggpht.com/a.jpg"}}
            },
            "statistics": {"viewCount": "1000", "subscriberCount": "20", "videoCount": "3", "hiddenSubscriberCount": false},
            "contentDetails": {"relatedPlaylists": {"uploads": "UUxO1tY8h1AhOz0T4ENwmpow"}}
        }))
        .unwrap();

        assert_eq!(channel.title(), "Fullscreen");
        assert_eq!(channel.subscriber_count(), Some(20));
        assert_eq!(channel.video_count(), Some(3));
        assert_eq!(channel.uploads_playlist_id(), Some("UUxO1tY8h1AhOz0T4ENwmpow"));
        assert_eq!(channel.thumbnail_url(), Some("https://yt3.ggpht.com/a.jpg"));
    }

    #[test]
    fn test_channel_with_only_id() {
        let channel: Channel = serde_json::from_value(json!({"id": "UC1"})).unwrap();
        assert_eq!(channel.title(), "");
        assert_eq!(channel.subscriber_count(), None);
        assert_eq!(channel.uploads_playlist_id(), None);
    }
}
