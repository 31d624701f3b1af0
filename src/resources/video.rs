use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::resources::{count, PrivacyStatus, Thumbnails};

static ISO8601_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
        .expect("duration pattern is valid")
});

/// A YouTube video.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#resource>
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// The video ID, e.g. `dQw4w9WgXcQ`.
    pub id: String,
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
    #[serde(default)]
    pub status: Option<VideoStatus>,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
    #[serde(default)]
    pub content_details: Option<VideoContentDetails>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatus {
    #[serde(default)]
    pub privacy_status: Option<PrivacyStatus>,
    /// E.g. `uploaded`, `processed` or `rejected`.
    #[serde(default)]
    pub upload_status: Option<String>,
    #[serde(default)]
    pub embeddable: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default, deserialize_with = "count::deserialize")]
    pub view_count: Option<u64>,
    #[serde(default, deserialize_with = "count::deserialize")]
    pub like_count: Option<u64>,
    #[serde(default, deserialize_with = "count::deserialize")]
    pub comment_count: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContentDetails {
    /// ISO 8601 duration, e.g. `PT4M13S`.
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
}

impl Video {
    #[must_use]
    pub fn title(&self) -> &str {
        self.snippet.as_ref().map_or("", |s| s.title.as_str())
    }

    #[must_use]
    pub fn description(&self) -> &str {
        self.snippet.as_ref().map_or("", |s| s.description.as_str())
    }

    #[must_use]
    pub fn channel_id(&self) -> Option<&str> {
        self.snippet.as_ref().map(|s| s.channel_id.as_str())
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        self.snippet.as_ref().map_or(&[], |s| s.tags.as_slice())
    }

    #[must_use]
    pub fn privacy_status(&self) -> Option<PrivacyStatus> {
        self.status.as_ref().and_then(|s| s.privacy_status)
    }

    #[must_use]
    pub fn view_count(&self) -> Option<u64> {
        self.statistics.as_ref().and_then(|s| s.view_count)
    }

    #[must_use]
    pub fn like_count(&self) -> Option<u64> {
        self.statistics.as_ref().and_then(|s| s.like_count)
    }

    /// Returns the length in seconds, parsed from `contentDetails.duration`.
    #[must_use]
    pub fn duration_seconds(&self) -> Option<u64> {
        self.content_details
            .as_ref()
            .and_then(|d| d.duration.as_deref())
            .and_then(parse_duration)
    }
}

fn parse_duration(duration: &str) -> Option<u64> {
    let captures = ISO8601_DURATION.captures(duration)?;
    let part = |index: usize| {
        captures
            .get(index)
            .map_or(Some(0), |m| m.as_str().parse::<u64>().ok())
    };
    Some(part(1)? * 86_400 + part(2)? * 3_600 + part(3)? * 60 + part(4)?)
}

/// A rating a user gives a video.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rating {
    Like,
    Dislike,
    /// Removes a previous rating.
    None,
}

impl Rating {
    /// Returns the value of the `rating` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
            Self::None => "none",
        }
    }
}

/// Attributes for uploading or updating a video.
///
/// Only the fields that are set are sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category_id: Option<String>,
    pub privacy_status: Option<PrivacyStatus>,
}

impl VideoParams {
    /// Returns the parts touched by these attributes, e.g. `snippet,status`.
    #[must_use]
    pub fn parts(&self) -> Vec<&'static str> {
        let mut parts = Vec::new();
        if self.title.is_some()
            || self.description.is_some()
            || self.tags.is_some()
            || self.category_id.is_some()
        {
            parts.push("snippet");
        }
        if self.privacy_status.is_some() {
            parts.push("status");
        }
        parts
    }

    /// Builds the request body, merging onto `current` when updating.
    ///
    /// The API replaces a whole part on update, so fields of `current` that are
    /// not set here are carried over.
    #[must_use]
    pub fn to_body(&self, id: Option<&str>, current: Option<&Video>) -> Value {
        let mut body = Map::new();
        if let Some(id) = id {
            body.insert("id".to_string(), json!(id));
        }

        if self.parts().contains(&"snippet") {
            let snippet = current.and_then(|v| v.snippet.as_ref());
            let mut fields = Map::new();
            let title = self
                .title
                .clone()
                .or_else(|| snippet.map(|s| s.title.clone()));
            if let Some(title) = title {
                fields.insert("title".to_string(), json!(title));
            }
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
            let category_id = self
                .category_id
                .clone()
                .or_else(|| snippet.and_then(|s| s.category_id.clone()));
            if let Some(category_id) = category_id {
                fields.insert("categoryId".to_string(), json!(category_id));
            }
            body.insert("snippet".to_string(), Value::Object(fields));
        }

        if let Some(privacy_status) = self.privacy_status {
            body.insert(
                "status".to_string(),
                json!({ "privacyStatus": privacy_status.as_str() }),
            );
        }

        Value::Object(body)
    }
}
