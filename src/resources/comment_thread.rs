use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A top-level comment and, optionally, its replies.
///
/// See: <https://developers.google.com/youtube/v3/docs/commentThreads#resource>
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThread {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<CommentThreadSnippet>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
    pub top_level_comment: Comment,
    #[serde(default)]
    pub total_reply_count: u64,
    #[serde(default)]
    pub can_reply: bool,
}

/// A single comment.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<CommentSnippet>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    /// The text as rendered (may contain HTML).
    #[serde(default)]
    pub text_display: String,
    #[serde(default)]
    pub text_original: Option<String>,
    #[serde(default)]
    pub author_display_name: String,
    #[serde(default)]
    pub author_channel_url: Option<String>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl CommentThread {
    /// Returns the top-level comment.
    #[must_use]
    pub fn top_level_comment(&self) -> Option<&Comment> {
        self.snippet.as_ref().map(|s| &s.top_level_comment)
    }

    /// Returns the text of the top-level comment.
    #[must_use]
    pub fn text_display(&self) -> &str {
        self.top_level_comment().map_or("", Comment::text_display)
    }

    #[must_use]
    pub fn author_display_name(&self) -> &str {
        self.top_level_comment()
            .and_then(|c| c.snippet.as_ref())
            .map_or("", |s| s.author_display_name.as_str())
    }

    #[must_use]
    pub fn total_reply_count(&self) -> u64 {
        self.snippet.as_ref().map_or(0, |s| s.total_reply_count)
    }
}

impl Comment {
    #[must_use]
    pub fn text_display(&self) -> &str {
        self.snippet.as_ref().map_or("", |s| s.text_display.as_str())
    }
}
