//! Recognition of YouTube URLs.
//!
//! # Example
//!
//! ```rust
//! use yt::YouTubeUrl;
//!
//! let url: YouTubeUrl = "https://youtu.be/dQw4w9WgXcQ".parse().unwrap();
//! assert_eq!(url, YouTubeUrl::Video { id: "dQw4w9WgXcQ".to_string() });
//!
//! let url: YouTubeUrl = "youtube.com/@fullscreen".parse().unwrap();
//! assert_eq!(url, YouTubeUrl::ChannelHandle { handle: "fullscreen".to_string() });
//! ```

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

const PREFIX: &str = r"^(?:https?://)?(?:www\.|m\.)?";

static VIDEO: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"youtube\.com/watch\?(?:.*&)?v=([\w-]{11})",
        r"youtube\.com/(?:embed|shorts|v)/([\w-]{11})",
        r"youtu\.be/([\w-]{11})",
    ]
    .iter()
    .map(|pattern| Regex::new(&format!("{PREFIX}{pattern}")).expect("video pattern is valid"))
    .collect()
});

static PLAYLIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{PREFIX}youtube\.com/playlist\?(?:.*&)?list=([\w-]+)"))
        .expect("playlist pattern is valid")
});

static CHANNEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{PREFIX}youtube\.com/channel/(UC[\w-]{{22}})"))
        .expect("channel pattern is valid")
});

static CHANNEL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{PREFIX}youtube\.com/(user/|c/|@)([\w.-]+)"))
        .expect("channel name pattern is valid")
});

/// Error returned when a string is not a recognized YouTube URL.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("'{url}' is not a recognized YouTube URL")]
pub struct UrlError {
    /// The string that failed to parse.
    pub url: String,
}

/// A parsed YouTube URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum YouTubeUrl {
    /// `watch?v=`, `youtu.be/`, `embed/` or `shorts/`.
    Video {
        /// The 11-character video ID.
        id: String,
    },
    /// `playlist?list=`.
    Playlist {
        /// The playlist ID.
        id: String,
    },
    /// `channel/UC…`, which carries the channel ID.
    Channel {
        /// The `UC`-prefixed channel ID.
        id: String,
    },
    /// Legacy `user/<name>`.
    ChannelUsername {
        /// The legacy username.
        username: String,
    },
    /// `c/<name>`.
    ChannelCustom {
        /// The custom name, resolved through search.
        name: String,
    },
    /// `@<handle>`.
    ChannelHandle {
        /// The handle without its leading `@`.
        handle: String,
    },
}

impl YouTubeUrl {
    /// Parses `url`.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError`] if `url` matches none of the known shapes.
    pub fn parse(url: &str) -> Result<Self, UrlError> {
        let url = url.trim();

        for pattern in VIDEO.iter() {
            if let Some(captures) = pattern.captures(url) {
                return Ok(Self::Video {
                    id: captures[1].to_string(),
                });
            }
        }
        if let Some(captures) = PLAYLIST.captures(url) {
            return Ok(Self::Playlist {
                id: captures[1].to_string(),
            });
        }
        if let Some(captures) = CHANNEL.captures(url) {
            return Ok(Self::Channel {
                id: captures[1].to_string(),
            });
        }
        if let Some(captures) = CHANNEL_NAME.captures(url) {
            let name = captures[2].to_string();
            return Ok(match &captures[1] {
                "user/" => Self::ChannelUsername { username: name },
                "c/" => Self::ChannelCustom { name },
                _ => Self::ChannelHandle { handle: name },
            });
        }

        Err(UrlError {
            url: url.to_string(),
        })
    }

    /// Returns `true` for any of the channel shapes.
    #[must_use]
    pub const fn is_channel(&self) -> bool {
        matches!(
            self,
            Self::Channel { .. }
                | Self::ChannelUsername { .. }
                | Self::ChannelCustom { .. }
                | Self::ChannelHandle { .. }
        )
    }
}

impl FromStr for YouTubeUrl {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
