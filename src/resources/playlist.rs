use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::resources::{PrivacyStatus, Thumbnails};

/// A YouTube playlist.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlists#resource>
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<PlaylistSnippet>,
    #[serde(default)]
    pub status: Option<PlaylistStatus>,
    #[serde(default)]
    pub content_details: Option<PlaylistContentDetails>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistStatus {
    #[serde(default)]
    pub privacy_status: Option<PrivacyStatus>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistContentDetails {
    #[serde(default)]
    pub item_count: Option<u64>,
}

impl Playlist {
    #[must_use]
    pub fn title(&self) -> &str {
        self.snippet.as_ref().map_or("", |s| s.title.as_str())
    }

    #[must_use]
    pub fn description(&self) -> &str {
        self.snippet.as_ref().map_or("", |s| s.description.as_str())
    }

    #[must_use]
    pub fn privacy_status(&self) -> Option<PrivacyStatus> {
        self.status.as_ref().and_then(|s| s.privacy_status)
    }

    #[must_use]
    pub fn item_count(&self) -> Option<u64> {
        self.content_details.as_ref().and_then(|d| d.item_count)
    }
}

/// Attributes for creating or updating a playlist.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaylistParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub privacy_status: Option<PrivacyStatus>,
}

impl PlaylistParams {
    /// Creates attributes with just a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Returns the parts touched by these attributes.
    #[must_use]
    pub fn parts(&self) -> Vec<&'static str> {
        let mut parts = vec!["snippet"];
        if self.privacy_status.is_some() {
            parts.push("status");
        }
        parts
    }

    /// Builds the request body. On update, unset snippet fields are carried
    /// over from `current`, since the title is mandatory.
    #[must_use]
    pub fn to_body(&self, id: Option<&str>, current: Option<&Playlist>) -> Value {
        let snippet = current.and_then(|p| p.snippet.as_ref());

        let mut fields = Map::new();
        let title = self
            .title
            .clone()
            .or_else(|| snippet.map(|s| s.title.clone()))
            .unwrap_or_default();
        fields.insert("title".to_string(), json!(title));
        let description = self
            .description
            .clone()
            .or_else(|| snippet.map(|s| s.description.clone()));
        if let Some(description) = description {
            fields.insert("description".to_string(), json!(description));
        }
        let tags = self.tags.clone().or_else(|| snippet.map(|s| s.tags.clone()));
        if let Some(tags) = tags {
            fields.insert("tags".to_string(), json!(tags));
        }

        let mut body = Map::new();
        if let Some(id) = id {
            body.insert("id".to_string(), json!(id));
        }
        body.insert("snippet".to_string(), Value::Object(fields));
        if let Some(privacy_status) = self.privacy_status {
            body.insert(
                "status".to_string(),
                json!({ "privacyStatus": privacy_status.as_str() }),
            );
        }
        Value::Object(body)
    }
}
