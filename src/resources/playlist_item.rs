use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::resources::{ResourceId, Thumbnails};

/// A video's entry in a playlist.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlistItems#resource>
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    /// The item ID; differs from the ID of the video it holds.
    pub id: String,
    #[serde(default)]
    pub snippet: Option<PlaylistItemSnippet>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub playlist_id: String,
    /// Zero-based position in the playlist.
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub resource_id: ResourceId,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

impl PlaylistItem {
    #[must_use]
    pub fn title(&self) -> &str {
        self.snippet.as_ref().map_or("", |s| s.title.as_str())
    }

    #[must_use]
    pub fn playlist_id(&self) -> Option<&str> {
        self.snippet.as_ref().map(|s| s.playlist_id.as_str())
    }

    /// Returns the ID of the video this item holds.
    #[must_use]
    pub fn video_id(&self) -> Option<&str> {
        self.snippet
            .as_ref()
            .and_then(|s| s.resource_id.video_id.as_deref())
    }

    #[must_use]
    pub fn position(&self) -> Option<u32> {
        self.snippet.as_ref().and_then(|s| s.position)
    }
}
