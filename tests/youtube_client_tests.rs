//! Integration tests for `YouTubeClient` resource operations.
//!
//! Each test mounts the endpoints an operation is expected to call on a
//! local mock server and checks the requests it makes and what it returns.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yt::auth::{Account, ContentOwner, MissingAuthError};
use yt::resources::{InsertOutcome, PlaylistParams, PrivacyStatus, Rating, VideoParams};
use yt::{ApiError, ApiKey, ErrorKind, HostUrl, HttpError, RetryPolicy, YouTubeClient, YtConfig};

fn create_config(server: &MockServer) -> YtConfig {
    YtConfig::builder()
        .api_key(ApiKey::new("test-key").unwrap())
        .api_host(HostUrl::new(server.uri()).unwrap())
        .oauth_host(HostUrl::new(server.uri()).unwrap())
        .retry_policy(RetryPolicy::new(3, Duration::ZERO, Duration::ZERO))
        .build()
}

/// Creates a client authorized with a fixed access token.
fn create_authorized_client(server: &MockServer) -> YouTubeClient {
    let config = create_config(server);
    let account = Account::builder(&config).access_token("ya29.token").build();
    YouTubeClient::with_authenticator(&config, Arc::new(account))
}

fn list(items: serde_json::Value) -> serde_json::Value {
    let total = items.as_array().map_or(0, Vec::len);
    json!({"pageInfo": {"totalResults": total}, "items": items})
}

fn channel_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "snippet": {"title": title},
        "statistics": {"subscriberCount": "1200", "videoCount": "42"},
        "contentDetails": {"relatedPlaylists": {"uploads": format!("UU{}", &id[2..])}}
    })
}

// ============================================================================
// Public Reads
// ============================================================================

#[tokio::test]
async fn test_video_by_id_uses_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .and(query_param("id", "dQw4w9WgXcQ"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(json!([{
            "id": "dQw4w9WgXcQ",
            "snippet": {"title": "Never Gonna Give You Up", "tags": ["music"]},
            "status": {"privacyStatus": "public"},
            "statistics": {"viewCount": "1000000"},
            "contentDetails": {"duration": "PT3M33S"}
        }]))))
        .expect(1)
        .mount(&server)
        .await;
    let client = YouTubeClient::new(&create_config(&server));

    let video = client.video("dQw4w9WgXcQ").await.unwrap();

    assert_eq!(video.title(), "Never Gonna Give You Up");
    assert_eq!(video.privacy_status(), Some(PrivacyStatus::Public));
    assert_eq!(video.view_count(), Some(1_000_000));
    assert_eq!(video.duration_seconds(), Some(213));
}

#[tokio::test]
async fn test_unknown_video_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(json!([]))))
        .mount(&server)
        .await;
    let client = YouTubeClient::new(&create_config(&server));

    let error = client.video("missing").await.unwrap_err();

    assert!(matches!(error, ApiError::NotFound { resource: "video", ref id } if id == "missing"));
}

#[tokio::test]
async fn test_client_without_credentials_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .expect(0)
        .mount(&server)
        .await;
    let config = YtConfig::builder()
        .api_host(HostUrl::new(server.uri()).unwrap())
        .build();
    let client = YouTubeClient::new(&config);

    let error = client.video("dQw4w9WgXcQ").await.unwrap_err();

    assert!(matches!(
        error,
        ApiError::Http(HttpError::MissingAuth(MissingAuthError::NoCredentials { .. }))
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_authorized_requests_do_not_send_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/channels"))
        .and(query_param("mine", "true"))
        .and(header("authorization", "Bearer ya29.token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(json!([channel_json(
            "UCxO1tY8h1AhOz0T4ENwmpow",
            "Fullscreen"
        )]))))
        .expect(1)
        .mount(&server)
        .await;
    let client = create_authorized_client(&server);

    let channel = client.my_channel().await.unwrap();

    assert_eq!(channel.title(), "Fullscreen");
    assert_eq!(channel.subscriber_count(), Some(1200));
    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].url.query_pairs().any(|(k, _)| k == "key"));
}

#[tokio::test]
async fn test_content_owner_requests_carry_owner_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/channels"))
        .and(query_param("managedByMe", "true"))
        .and(query_param("onBehalfOfContentOwner", "BlackBoxMusic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(json!([
            channel_json("UCaaaaaaaaaaaaaaaaaaaaaa", "One"),
            channel_json("UCbbbbbbbbbbbbbbbbbbbbbb", "Two")
        ]))))
        .expect(1)
        .mount(&server)
        .await;
    let config = create_config(&server);
    let account = Account::builder(&config).access_token("ya29.owner").build();
    let owner = ContentOwner::new("BlackBoxMusic", account);
    let client = YouTubeClient::with_authenticator(&config, Arc::new(owner));

    let titles = client
        .partnered_channels()
        .unwrap()
        .map(|channel| channel.title().to_string())
        .await
        .unwrap();

    assert_eq!(titles, vec!["One", "Two"]);
}

// ============================================================================
// Channel URLs
// ============================================================================

#[tokio::test]
async fn test_channel_by_handle_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/channels"))
        .and(query_param("forHandle", "@fullscreen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(json!([channel_json(
            "UCxO1tY8h1AhOz0T4ENwmpow",
            "Fullscreen"
        )]))))
        .expect(1)
        .mount(&server)
        .await;
    let client = YouTubeClient::new(&create_config(&server));

    let channel = client
        .channel_by_url("https://www.youtube.com/@fullscreen")
        .await
        .unwrap();

    assert_eq!(channel.id, "UCxO1tY8h1AhOz0T4ENwmpow");
}

#[tokio::test]
async fn test_channel_by_custom_url_searches_then_fetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .and(query_param("q", "Fullscreen"))
        .and(query_param("type", "channel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(json!([{
            "id": {"kind": "youtube#channel", "channelId": "UCxO1tY8h1AhOz0T4ENwmpow"}
        }]))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/channels"))
        .and(query_param("id", "UCxO1tY8h1AhOz0T4ENwmpow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(json!([channel_json(
            "UCxO1tY8h1AhOz0T4ENwmpow",
            "Fullscreen"
        )]))))
        .expect(1)
        .mount(&server)
        .await;
    let client = YouTubeClient::new(&create_config(&server));

    let channel = client
        .channel_by_url("https://www.youtube.com/c/Fullscreen")
        .await
        .unwrap();

    assert_eq!(channel.title(), "Fullscreen");
}

#[tokio::test]
async fn test_channel_by_video_url_is_rejected_without_requests() {
    let server = MockServer::start().await;
    let client = YouTubeClient::new(&create_config(&server));

    let error = client
        .channel_by_url("https://youtu.be/dQw4w9WgXcQ")
        .await
        .unwrap_err();

    assert!(matches!(error, ApiError::InvalidUrl(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Subscriptions
// ============================================================================

#[tokio::test]
async fn test_subscribe_creates_subscription() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/youtube/v3/subscriptions"))
        .and(query_param("part", "snippet"))
        .and(body_partial_json(json!({
            "snippet": {"resourceId": {"kind": "youtube#channel", "channelId": "UCxO1tY8h1AhOz0T4ENwmpow"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "sub-1",
            "snippet": {
                "title": "Fullscreen",
                "resourceId": {"kind": "youtube#channel", "channelId": "UCxO1tY8h1AhOz0T4ENwmpow"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = create_authorized_client(&server);

    let outcome = client.subscribe("UCxO1tY8h1AhOz0T4ENwmpow").await.unwrap();

    let subscription = outcome.created().unwrap();
    assert_eq!(subscription.id, "sub-1");
    assert_eq!(
        subscription.subscribed_channel_id(),
        Some("UCxO1tY8h1AhOz0T4ENwmpow")
    );
}

#[tokio::test]
async fn test_duplicate_subscription_is_already_exists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/youtube/v3/subscriptions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "errors": [{"reason": "subscriptionDuplicate", "message": "The subscription already exists."}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = create_authorized_client(&server);

    let outcome = client.subscribe("UCxO1tY8h1AhOz0T4ENwmpow").await.unwrap();

    assert!(outcome.already_exists());
}

#[tokio::test]
async fn test_subscribe_with_other_bad_request_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/youtube/v3/subscriptions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "errors": [{"reason": "subscriptionForbidden", "message": "Too many subscriptions."}]
            }
        })))
        .mount(&server)
        .await;
    let client = create_authorized_client(&server);

    let error = client.subscribe("UCxO1tY8h1AhOz0T4ENwmpow").await.unwrap_err();

    assert_eq!(error.kind(), Some(ErrorKind::RequestError));
    assert!(error.has_reason("subscriptionForbidden"));
}

#[tokio::test]
async fn test_unsubscribe_expects_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/youtube/v3/subscriptions"))
        .and(query_param("id", "sub-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let client = create_authorized_client(&server);

    client.unsubscribe("sub-1").await.unwrap();
}

// ============================================================================
// Playlists
// ============================================================================

#[tokio::test]
async fn test_create_playlist_sends_snippet_and_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/youtube/v3/playlists"))
        .and(query_param("part", "snippet,status"))
        .and(body_partial_json(json!({
            "snippet": {"title": "Road trip"},
            "status": {"privacyStatus": "private"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "PL1",
            "snippet": {"title": "Road trip"},
            "status": {"privacyStatus": "private"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = create_authorized_client(&server);
    let params = PlaylistParams {
        privacy_status: Some(PrivacyStatus::Private),
        ..PlaylistParams::titled("Road trip")
    };

    let playlist = client.create_playlist(&params).await.unwrap();

    assert_eq!(playlist.id, "PL1");
    assert_eq!(playlist.privacy_status(), Some(PrivacyStatus::Private));
}

#[tokio::test]
async fn test_find_playlist_by_title_scans_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/playlists"))
        .and(query_param("pageToken", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "PL2", "snippet": {"title": "Favorites"}}]
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/playlists"))
        .and(query_param("mine", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nextPageToken": "p2",
            "items": [{"id": "PL1", "snippet": {"title": "Road trip"}}]
        })))
        .mount(&server)
        .await;
    let client = create_authorized_client(&server);

    let playlist = client.find_playlist_by_title("Favorites").await.unwrap();

    assert_eq!(playlist.map(|p| p.id), Some("PL2".to_string()));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_add_video_to_playlist() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/youtube/v3/playlistItems"))
        .and(body_partial_json(json!({
            "snippet": {"playlistId": "PL1", "resourceId": {"videoId": "dQw4w9WgXcQ"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "item-1",
            "snippet": {
                "title": "Never Gonna Give You Up",
                "playlistId": "PL1",
                "position": 0,
                "resourceId": {"kind": "youtube#video", "videoId": "dQw4w9WgXcQ"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = create_authorized_client(&server);

    let item = client
        .add_video_to_playlist("PL1", "dQw4w9WgXcQ")
        .await
        .unwrap();

    assert_eq!(item.video_id(), Some("dQw4w9WgXcQ"));
    assert_eq!(item.position(), Some(0));
}

#[tokio::test]
async fn test_delete_playlist_rejects_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/youtube/v3/playlists"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "errors": [{"reason": "playlistNotFound", "message": "Not found."}]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = create_authorized_client(&server);

    let error = client.delete_playlist("PL1").await.unwrap_err();

    assert!(error.has_reason("playlistNotFound"));
}

// ============================================================================
// Videos
// ============================================================================

#[tokio::test]
async fn test_rate_video() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/youtube/v3/videos/rate"))
        .and(query_param("id", "dQw4w9WgXcQ"))
        .and(query_param("rating", "like"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let client = create_authorized_client(&server);

    client.rate_video("dQw4w9WgXcQ", Rating::Like).await.unwrap();
}

#[tokio::test]
async fn test_update_video_keeps_unchanged_snippet_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .and(query_param("id", "vid12345678"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(json!([{
            "id": "vid12345678",
            "snippet": {"title": "Old title", "description": "Kept", "categoryId": "22"}
        }]))))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/youtube/v3/videos"))
        .and(query_param("part", "snippet"))
        .and(body_partial_json(json!({
            "id": "vid12345678",
            "snippet": {"title": "New title", "description": "Kept", "categoryId": "22"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "vid12345678",
            "snippet": {"title": "New title", "description": "Kept"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = create_authorized_client(&server);
    let params = VideoParams {
        title: Some("New title".to_string()),
        ..VideoParams::default()
    };

    let video = client.update_video("vid12345678", &params).await.unwrap();

    assert_eq!(video.title(), "New title");
    assert_eq!(video.description(), "Kept");
}

#[tokio::test]
async fn test_upload_video_follows_session_location() {
    let server = MockServer::start().await;
    let location = format!(
        "{}/upload/youtube/v3/videos?uploadType=resumable&upload_id=xyz",
        server.uri()
    );
    Mock::given(method("POST"))
        .and(path("/upload/youtube/v3/videos"))
        .and(query_param("uploadType", "resumable"))
        .and(header("x-upload-content-length", "4"))
        .and(header("x-upload-content-type", "video/mp4"))
        .and(body_partial_json(json!({"snippet": {"title": "Clip"}})))
        .respond_with(ResponseTemplate::new(200).insert_header("Location", location.as_str()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/upload/youtube/v3/videos"))
        .and(query_param("upload_id", "xyz"))
        .and(header("content-type", "video/mp4"))
        .and(header("authorization", "Bearer ya29.token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "new12345678",
            "snippet": {"title": "Clip"},
            "status": {"uploadStatus": "uploaded", "privacyStatus": "private"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = create_authorized_client(&server);
    let params = VideoParams {
        title: Some("Clip".to_string()),
        privacy_status: Some(PrivacyStatus::Private),
        ..VideoParams::default()
    };

    let video = client
        .upload_video(vec![0_u8, 1, 2, 3], "video/mp4", &params)
        .await
        .unwrap();

    assert_eq!(video.id, "new12345678");
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[1].body, vec![0_u8, 1, 2, 3]);
}

#[tokio::test]
async fn test_upload_without_location_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/youtube/v3/videos"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let client = create_authorized_client(&server);

    let error = client
        .upload_video(vec![0_u8], "video/mp4", &VideoParams::default())
        .await
        .unwrap_err();

    assert!(matches!(error, ApiError::MissingUploadLocation));
}

// ============================================================================
// Comments
// ============================================================================

#[tokio::test]
async fn test_comment_threads_for_video() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/commentThreads"))
        .and(query_param("videoId", "dQw4w9WgXcQ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "thread-1",
                "snippet": {
                    "videoId": "dQw4w9WgXcQ",
                    "totalReplyCount": 2,
                    "topLevelComment": {
                        "id": "comment-1",
                        "snippet": {"textDisplay": "Classic", "authorDisplayName": "Rick"}
                    }
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = YouTubeClient::new(&create_config(&server));

    let threads = client
        .comment_threads()
        .unwrap()
        .filter_by([("video_id", "dQw4w9WgXcQ")])
        .to_vec()
        .await
        .unwrap();

    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].text_display(), "Classic");
    assert_eq!(threads[0].author_display_name(), "Rick");
    assert_eq!(threads[0].total_reply_count(), 2);
}
