//! # yt-rust
//!
//! A Rust client for the YouTube Data API v3.
//!
//! ## Overview
//!
//! This crate provides:
//! - Instance-based configuration via [`YtConfig`] and [`YtConfigBuilder`]
//! - A request engine that classifies failures and retries them: one token
//!   refresh on 401, backoff on server errors and exceeded quotas
//! - Lazy pagination of list endpoints through [`Collection`]
//! - OAuth 2.0 accounts (web-server, device and refresh-token flows) via
//!   [`auth::Account`]
//! - Typed resources: channels, videos, playlists, playlist items,
//!   subscriptions and comment threads
//! - Parsing of YouTube URLs via [`YouTubeUrl`]
//!
//! ## Quick Start
//!
//! ```rust
//! use yt::{ApiKey, YouTubeClient, YtConfig};
//!
//! let config = YtConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .build();
//!
//! let client = YouTubeClient::new(&config);
//! ```
//!
//! ## Reading public data
//!
//! ```rust,ignore
//! let video = client.video("dQw4w9WgXcQ").await?;
//! println!("{} ({:?}s)", video.title(), video.duration_seconds());
//!
//! let mut popular = client.videos()?.filter_by([("chart", "mostPopular")]);
//! for title in popular.map(|v| v.title().to_string()).await? {
//!     println!("{title}");
//! }
//! ```
//!
//! ## Acting on behalf of a user
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use yt::auth::Account;
//! use yt::resources::{InsertOutcome, PlaylistParams};
//!
//! let config = YtConfig::from_env()?;
//! let account = Account::builder(&config)
//!     .refresh_token(stored_refresh_token)
//!     .build();
//! let client = YouTubeClient::with_authenticator(&config, Arc::new(account));
//!
//! let playlist = client.create_playlist(&PlaylistParams::titled("Road trip")).await?;
//! client.add_video_to_playlist(&playlist.id, "dQw4w9WgXcQ").await?;
//!
//! if let InsertOutcome::AlreadyExists = client.subscribe("UCxO1tY8h1AhOz0T4ENwmpow").await? {
//!     println!("Already subscribed");
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events (requests at
//! `debug`, retries at `warn`, pages at `trace`) and never installs a
//! subscriber. Request bodies and tokens are never logged; set
//! [`YtConfig::debug`] to include them in error messages.

pub mod auth;
pub mod clients;
pub mod collections;
pub mod config;
pub mod error;
pub mod resources;
pub mod youtube_url;

// Re-export public types at crate root for convenience
pub use config::{ApiKey, ClientId, ClientSecret, HostUrl, YtConfig, YtConfigBuilder};
pub use error::ConfigError;

// Re-export the request engine
pub use clients::{
    ErrorKind, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    InvalidHttpRequestError, RequestError, RetryPolicy,
};

// Re-export the resource client
pub use clients::youtube::{ApiError, YouTubeClient};
pub use collections::{Collection, Paginator};
pub use youtube_url::{UrlError, YouTubeUrl};

// Re-export authentication types
pub use auth::{Account, Authenticator, ContentOwner, MissingAuthError, StateParam};
