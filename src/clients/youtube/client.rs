//! Resource operations on the YouTube Data API v3.

use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::auth::{Authenticator, MissingAuthError};
use crate::clients::youtube::errors::ApiError;
use crate::clients::{
    ExpectedResponse, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder,
    HttpResponse,
};
use crate::collections::{Collection, DEFAULT_PAGE_SIZE, SEARCH_PAGE_LIMIT};
use crate::config::YtConfig;
use crate::resources::{
    Channel, CommentThread, InsertOutcome, Playlist, PlaylistItem, PlaylistParams, Rating,
    Subscription, Video, VideoParams,
};
use crate::youtube_url::{UrlError, YouTubeUrl};

const CHANNELS: &str = "/youtube/v3/channels";
const VIDEOS: &str = "/youtube/v3/videos";
const RATE_VIDEO: &str = "/youtube/v3/videos/rate";
const UPLOAD_VIDEO: &str = "/upload/youtube/v3/videos";
const PLAYLISTS: &str = "/youtube/v3/playlists";
const PLAYLIST_ITEMS: &str = "/youtube/v3/playlistItems";
const SUBSCRIPTIONS: &str = "/youtube/v3/subscriptions";
const COMMENT_THREADS: &str = "/youtube/v3/commentThreads";
const SEARCH: &str = "/youtube/v3/search";

const CHANNEL_PARTS: [&str; 3] = ["snippet", "statistics", "contentDetails"];
const VIDEO_PARTS: [&str; 4] = ["snippet", "status", "statistics", "contentDetails"];
const PLAYLIST_PARTS: [&str; 3] = ["snippet", "status", "contentDetails"];

/// Client for YouTube resources.
///
/// Without an authenticator, requests carry the configured API key and can
/// only read public data. With one, they carry its bearer token.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use yt::auth::Account;
/// use yt::{YouTubeClient, YtConfig};
///
/// let config = YtConfig::from_env()?;
/// let account = Account::builder(&config).refresh_token(token).build();
/// let client = YouTubeClient::with_authenticator(&config, Arc::new(account));
///
/// let channel = client.my_channel().await?;
/// let mut uploads = client.my_videos().await?;
/// println!("{} has {} videos", channel.title(), uploads.count().await?);
/// ```
#[derive(Clone, Debug)]
pub struct YouTubeClient {
    http: HttpClient,
    config: YtConfig,
    auth: Option<Arc<dyn Authenticator>>,
}

// Verify YouTubeClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<YouTubeClient>();
};

impl YouTubeClient {
    /// Creates a client that authenticates with the configured API key only.
    #[must_use]
    pub fn new(config: &YtConfig) -> Self {
        Self {
            http: HttpClient::new(config),
            config: config.clone(),
            auth: None,
        }
    }

    /// Creates a client whose requests are authorized by `auth`.
    #[must_use]
    pub fn with_authenticator(config: &YtConfig, auth: Arc<dyn Authenticator>) -> Self {
        Self {
            http: HttpClient::new(config),
            config: config.clone(),
            auth: Some(auth),
        }
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http
    }

    // === Channels ===

    /// Returns the channel with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no channel has this ID.
    pub async fn channel(&self, id: &str) -> Result<Channel, ApiError> {
        self.fetch_one(CHANNELS, "channel", id, &CHANNEL_PARTS).await
    }

    /// Returns the channel of the authorized account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the account has no channel.
    pub async fn my_channel(&self) -> Result<Channel, ApiError> {
        self.channels()?
            .filter_by([("mine", "true")])
            .first()
            .await?
            .ok_or_else(|| ApiError::NotFound {
                resource: "channel",
                id: "mine".to_string(),
            })
    }

    /// Returns a collection of channels; filter it with e.g. `id`, `forHandle`
    /// or `forUsername`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request cannot be built.
    pub fn channels(&self) -> Result<Collection<Channel>, ApiError> {
        self.collection(CHANNELS, &CHANNEL_PARTS)
    }

    /// Resolves a channel URL (`channel/`, `user/`, `c/` or `@handle`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] for URLs that are not channel URLs, and
    /// [`ApiError::NotFound`] if nothing matches.
    pub async fn channel_by_url(&self, url: &str) -> Result<Channel, ApiError> {
        let filter = match YouTubeUrl::parse(url)? {
            YouTubeUrl::Channel { id } => return self.channel(&id).await,
            YouTubeUrl::ChannelUsername { username } => ("forUsername", username),
            YouTubeUrl::ChannelHandle { handle } => ("forHandle", format!("@{handle}")),
            YouTubeUrl::ChannelCustom { name } => {
                let id = self.search_channel_id(&name).await?;
                return self.channel(&id).await;
            }
            YouTubeUrl::Video { .. } | YouTubeUrl::Playlist { .. } => {
                return Err(UrlError {
                    url: url.to_string(),
                }
                .into());
            }
        };

        let (key, value) = filter;
        self.channels()?
            .filter_by([(key, value.as_str())])
            .first()
            .await?
            .ok_or_else(|| ApiError::NotFound {
                resource: "channel",
                id: value,
            })
    }

    async fn search_channel_id(&self, name: &str) -> Result<String, ApiError> {
        let request = self
            .request(HttpMethod::Get, SEARCH)?
            .query_param("part", "id")
            .query_param("type", "channel")
            .query_param("q", name)
            .query_param("max_results", 1_u32)
            .build()?;
        let response = self.send(&request).await?;

        response
            .body
            .pointer("/items/0/id/channelId")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| ApiError::NotFound {
                resource: "channel",
                id: name.to_string(),
            })
    }

    /// Returns the channels managed by the content owner of this client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request cannot be built.
    pub fn partnered_channels(&self) -> Result<Collection<Channel>, ApiError> {
        Ok(self.channels()?.filter_by([("managedByMe", "true")]))
    }

    // === Videos ===

    /// Returns the video with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no video has this ID.
    pub async fn video(&self, id: &str) -> Result<Video, ApiError> {
        self.fetch_one(VIDEOS, "video", id, &VIDEO_PARTS).await
    }

    /// Returns a collection of videos; filter it with `id` or `chart`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request cannot be built.
    pub fn videos(&self) -> Result<Collection<Video>, ApiError> {
        self.collection(VIDEOS, &VIDEO_PARTS)
    }

    /// Returns the uploads of the authorized account, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the account's channel cannot be fetched.
    pub async fn my_videos(&self) -> Result<Collection<PlaylistItem>, ApiError> {
        let channel = self.my_channel().await?;
        let uploads = channel
            .uploads_playlist_id()
            .ok_or_else(|| ApiError::NotFound {
                resource: "uploads playlist",
                id: channel.id.clone(),
            })?;
        self.playlist_items(uploads)
    }

    /// Likes, dislikes or removes the rating of a video.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn rate_video(&self, id: &str, rating: Rating) -> Result<(), ApiError> {
        let request = self
            .request(HttpMethod::Post, RATE_VIDEO)?
            .query_param("id", id)
            .query_param("rating", rating.as_str())
            .expected_response(ExpectedResponse::NoContent)
            .build()?;
        self.send(&request).await?;
        Ok(())
    }

    /// Uploads a video with a resumable upload session.
    ///
    /// The metadata is sent first; the bytes are then sent to the session URL
    /// returned in the `Location` header.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingUploadLocation`] if the session has no
    /// usable `Location`, or the error of either request.
    pub async fn upload_video(
        &self,
        data: impl Into<Bytes>,
        content_type: &str,
        params: &VideoParams,
    ) -> Result<Video, ApiError> {
        let data = data.into();
        let mut parts = params.parts();
        if parts.is_empty() {
            parts = vec!["snippet", "status"];
        }

        let session = self
            .request(HttpMethod::Post, UPLOAD_VIDEO)?
            .query_param("upload_type", "resumable")
            .query_param("part", parts)
            .header("X-Upload-Content-Length", data.len().to_string())
            .header("X-Upload-Content-Type", content_type)
            .json_body(params.to_body(None, None))
            .build()?;
        let response = self.send(&session).await?;

        let location = response
            .header("location")
            .and_then(|location| reqwest::Url::parse(location).ok())
            .ok_or(ApiError::MissingUploadLocation)?;
        tracing::debug!(path = location.path(), bytes = data.len(), "Uploading video");

        let mut upload = self
            .request(HttpMethod::Put, location.path())?
            .host(location.origin().ascii_serialization())
            .stream_body(data, content_type);
        for (key, value) in location.query_pairs() {
            upload = upload.raw_query_param(key.into_owned(), value.into_owned());
        }
        let response = self.send(&upload.build()?).await?;
        decode(response.body)
    }

    /// Updates the given attributes of a video, keeping the others.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the video cannot be fetched or updated.
    pub async fn update_video(&self, id: &str, params: &VideoParams) -> Result<Video, ApiError> {
        let current = self.video(id).await?;
        let request = self
            .request(HttpMethod::Put, VIDEOS)?
            .query_param("part", params.parts())
            .json_body(params.to_body(Some(id), Some(&current)))
            .build()?;
        decode(self.send(&request).await?.body)
    }

    /// Deletes a video.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn delete_video(&self, id: &str) -> Result<(), ApiError> {
        self.delete(VIDEOS, id).await
    }

    // === Playlists ===

    /// Returns the playlist with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no playlist has this ID.
    pub async fn playlist(&self, id: &str) -> Result<Playlist, ApiError> {
        self.fetch_one(PLAYLISTS, "playlist", id, &PLAYLIST_PARTS).await
    }

    /// Returns the playlists of the authorized account.
    ///
    /// Use [`Collection::filter_by`] with `channelId` for another channel's
    /// playlists.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request cannot be built.
    pub fn playlists(&self) -> Result<Collection<Playlist>, ApiError> {
        Ok(self
            .collection::<Playlist>(PLAYLISTS, &PLAYLIST_PARTS)?
            .filter_by([("mine", "true")]))
    }

    /// Creates a playlist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn create_playlist(&self, params: &PlaylistParams) -> Result<Playlist, ApiError> {
        let request = self
            .request(HttpMethod::Post, PLAYLISTS)?
            .query_param("part", params.parts())
            .json_body(params.to_body(None, None))
            .build()?;
        decode(self.send(&request).await?.body)
    }

    /// Updates the given attributes of a playlist, keeping the others.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the playlist cannot be fetched or updated.
    pub async fn update_playlist(
        &self,
        id: &str,
        params: &PlaylistParams,
    ) -> Result<Playlist, ApiError> {
        let current = self.playlist(id).await?;
        let request = self
            .request(HttpMethod::Put, PLAYLISTS)?
            .query_param("part", params.parts())
            .json_body(params.to_body(Some(id), Some(&current)))
            .build()?;
        decode(self.send(&request).await?.body)
    }

    /// Deletes a playlist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn delete_playlist(&self, id: &str) -> Result<(), ApiError> {
        self.delete(PLAYLISTS, id).await
    }

    /// Finds one of the account's playlists by exact title.
    ///
    /// Scans at most 10 pages of 50 playlists.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a page request fails.
    pub async fn find_playlist_by_title(&self, title: &str) -> Result<Option<Playlist>, ApiError> {
        self.playlists()?
            .with_page_limit(SEARCH_PAGE_LIMIT)
            .find(|playlist| playlist.title() == title)
            .await
    }

    // === Playlist items ===

    /// Returns the items of a playlist, in playlist order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request cannot be built.
    pub fn playlist_items(&self, playlist_id: &str) -> Result<Collection<PlaylistItem>, ApiError> {
        Ok(self
            .collection::<PlaylistItem>(PLAYLIST_ITEMS, &["snippet"])?
            .filter_by([("playlistId", playlist_id)]))
    }

    /// Appends a video to a playlist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn add_video_to_playlist(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<PlaylistItem, ApiError> {
        let request = self
            .request(HttpMethod::Post, PLAYLIST_ITEMS)?
            .query_param("part", "snippet")
            .json_body(json!({
                "snippet": {
                    "playlistId": playlist_id,
                    "resourceId": {"kind": "youtube#video", "videoId": video_id}
                }
            }))
            .build()?;
        decode(self.send(&request).await?.body)
    }

    /// Finds the item holding `video_id` in a playlist.
    ///
    /// Scans at most 10 pages of 50 items.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a page request fails.
    pub async fn find_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<Option<PlaylistItem>, ApiError> {
        self.playlist_items(playlist_id)?
            .with_page_limit(SEARCH_PAGE_LIMIT)
            .find(|item| item.video_id() == Some(video_id))
            .await
    }

    /// Removes an item from its playlist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn delete_playlist_item(&self, item_id: &str) -> Result<(), ApiError> {
        self.delete(PLAYLIST_ITEMS, item_id).await
    }

    // === Subscriptions ===

    /// Returns the subscriptions of the authorized account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request cannot be built.
    pub fn subscriptions(&self) -> Result<Collection<Subscription>, ApiError> {
        Ok(self
            .collection::<Subscription>(SUBSCRIPTIONS, &["snippet"])?
            .filter_by([("mine", "true")]))
    }

    /// Subscribes the authorized account to a channel.
    ///
    /// Subscribing twice is not an error: the API's `subscriptionDuplicate`
    /// answer becomes [`InsertOutcome::AlreadyExists`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for any other failure.
    pub async fn subscribe(
        &self,
        channel_id: &str,
    ) -> Result<InsertOutcome<Subscription>, ApiError> {
        let request = self
            .request(HttpMethod::Post, SUBSCRIPTIONS)?
            .query_param("part", "snippet")
            .json_body(json!({
                "snippet": {
                    "resourceId": {"kind": "youtube#channel", "channelId": channel_id}
                }
            }))
            .build()?;

        match self.http.request(&request).await {
            Ok(response) => Ok(InsertOutcome::Created(decode(response.body)?)),
            Err(HttpError::Request(error))
                if error.status() == Some(400) && error.has_reason("subscriptionDuplicate") =>
            {
                tracing::debug!(channel_id, "Already subscribed");
                Ok(InsertOutcome::AlreadyExists)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Deletes a subscription.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn unsubscribe(&self, subscription_id: &str) -> Result<(), ApiError> {
        self.delete(SUBSCRIPTIONS, subscription_id).await
    }

    /// Returns the account's subscription to a channel, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a page request fails.
    pub async fn subscription_to(&self, channel_id: &str) -> Result<Option<Subscription>, ApiError> {
        self.subscriptions()?
            .filter_by([("forChannelId", channel_id)])
            .with_page_limit(SEARCH_PAGE_LIMIT)
            .find(|subscription| subscription.subscribed_channel_id() == Some(channel_id))
            .await
    }

    // === Comments ===

    /// Returns comment threads; filter them with `videoId` or
    /// `allThreadsRelatedToChannelId`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request cannot be built.
    pub fn comment_threads(&self) -> Result<Collection<CommentThread>, ApiError> {
        self.collection(COMMENT_THREADS, &["snippet"])
    }

    // === Helpers ===

    fn request(&self, method: HttpMethod, path: &str) -> Result<HttpRequestBuilder, ApiError> {
        let mut builder = HttpRequest::builder(method, path)
            .host(self.config.api_host())
            .auth(self.auth.clone());

        match &self.auth {
            Some(auth) => {
                if let Some(owner) = auth.on_behalf_of_content_owner() {
                    builder = builder.query_param("on_behalf_of_content_owner", owner);
                }
            }
            None => {
                let key = self.config.api_key().cloned().ok_or_else(|| {
                    MissingAuthError::NoCredentials {
                        reason: "neither an API key nor an authenticator is configured"
                            .to_string(),
                    }
                })?;
                builder = builder.api_key(Some(key));
            }
        }
        Ok(builder)
    }

    fn collection<T: DeserializeOwned>(
        &self,
        path: &str,
        parts: &[&str],
    ) -> Result<Collection<T>, ApiError> {
        let request = self
            .request(HttpMethod::Get, path)?
            .query_param("part", parts.to_vec())
            .query_param("max_results", DEFAULT_PAGE_SIZE)
            .build()?;
        Ok(Collection::new(self.http.clone(), request))
    }

    async fn fetch_one<T: DeserializeOwned>(
        &self,
        path: &str,
        resource: &'static str,
        id: &str,
        parts: &[&str],
    ) -> Result<T, ApiError> {
        let request = self
            .request(HttpMethod::Get, path)?
            .query_param("id", id)
            .query_param("part", parts.to_vec())
            .build()?;
        let response = self.send(&request).await?;

        match response.body.pointer("/items/0") {
            Some(item) => decode(item.clone()),
            None => Err(ApiError::NotFound {
                resource,
                id: id.to_string(),
            }),
        }
    }

    async fn delete(&self, path: &str, id: &str) -> Result<(), ApiError> {
        let request = self
            .request(HttpMethod::Delete, path)?
            .query_param("id", id)
            .expected_response(ExpectedResponse::NoContent)
            .build()?;
        self.send(&request).await?;
        Ok(())
    }

    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        Ok(self.http.request(request).await?)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    Ok(serde_json::from_value(value)?)
}
