//! Typed YouTube resources.
//!
//! Each resource mirrors the JSON returned by the Data API v3. Parts that were
//! not requested through the `part` parameter deserialize to `None`.
//!
//! # Overview
//!
//! - [`Channel`], [`Video`], [`Playlist`], [`PlaylistItem`], [`Subscription`],
//!   [`CommentThread`] / [`Comment`]
//! - [`VideoParams`], [`PlaylistParams`]: attributes for inserts and updates
//! - [`InsertOutcome`]: the result of an insert that may already exist

mod channel;
mod comment_thread;
mod playlist;
mod playlist_item;
mod subscription;
mod video;

pub use channel::{Channel, ChannelContentDetails, ChannelSnippet, ChannelStatistics, RelatedPlaylists};
pub use comment_thread::{Comment, CommentSnippet, CommentThread, CommentThreadSnippet};
pub use playlist::{Playlist, PlaylistContentDetails, PlaylistParams, PlaylistSnippet, PlaylistStatus};
pub use playlist_item::{PlaylistItem, PlaylistItemSnippet};
pub use subscription::{Subscription, SubscriptionSnippet};
pub use video::{
    Rating, Video, VideoContentDetails, VideoParams, VideoSnippet, VideoStatistics, VideoStatus,
};

use serde::{Deserialize, Serialize};

/// The result of inserting a resource that may already exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertOutcome<T> {
    /// The resource was created.
    Created(T),
    /// An identical resource already existed; nothing changed.
    AlreadyExists,
}

impl<T> InsertOutcome<T> {
    /// Returns the created resource, if any.
    #[must_use]
    pub fn created(self) -> Option<T> {
        match self {
            Self::Created(resource) => Some(resource),
            Self::AlreadyExists => None,
        }
    }

    /// Returns `true` if the resource already existed.
    #[must_use]
    pub const fn already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists)
    }
}

/// Who can see a video or playlist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrivacyStatus {
    /// Visible to everyone.
    Public,
    /// Visible only to the owner and invited users.
    Private,
    /// Visible to anyone with the link.
    Unlisted,
}

impl PrivacyStatus {
    /// Returns the value sent to the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Unlisted => "unlisted",
        }
    }
}

/// A thumbnail image.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Thumbnail {
    /// The image URL.
    pub url: String,
    /// Width in pixels, when reported.
    #[serde(default)]
    pub width: Option<u32>,
    /// Height in pixels, when reported.
    #[serde(default)]
    pub height: Option<u32>,
}

/// Thumbnails of a resource, by size.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Thumbnails {
    /// The smallest size, typically 120x90.
    #[serde(default)]
    pub default: Option<Thumbnail>,
    /// Typically 320x180.
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    /// Typically 480x360.
    #[serde(default)]
    pub high: Option<Thumbnail>,
}

impl Thumbnails {
    /// Returns the URL of the largest available thumbnail.
    #[must_use]
    pub fn best_url(&self) -> Option<&str> {
        self.high
            .as_ref()
            .or(self.medium.as_ref())
            .or(self.default.as_ref())
            .map(|thumbnail| thumbnail.url.as_str())
    }
}

/// What a playlist item or subscription points to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    /// E.g. `youtube#video` or `youtube#channel`.
    #[serde(default)]
    pub kind: String,
    /// Set when `kind` is `youtube#video`.
    #[serde(default)]
    pub video_id: Option<String>,
    /// Set when `kind` is `youtube#channel`.
    #[serde(default)]
    pub channel_id: Option<String>,
}

/// Statistics counts arrive as decimal strings; accepts numbers too.
pub(crate) mod count {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Number(value)) => Ok(Some(value)),
            Some(Raw::Text(text)) => text.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}
