//! HTTP client tests against a mock backend

use assert_matches::assert_matches;
use marketsync::client::{Config, HttpRemoteClient, RemoteClient, SessionCredentials};
use marketsync::shared::{AppConfig, SyncError};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server_url: &str, token: Option<&str>) -> HttpRemoteClient {
    let config = Config::with_builder(AppConfig::builder().server_url(server_url))
        .expect("valid config");
    let credentials = match token {
        Some(token) => SessionCredentials::with_token(token),
        None => SessionCredentials::new(),
    };
    HttpRemoteClient::new(config, Arc::new(credentials)).expect("client builds")
}

#[tokio::test]
async fn test_list_conversations_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/messages/conversations"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversations": [
                {
                    "id": 3,
                    "other_user_id": 12,
                    "other_user_username": "amina",
                    "last_message": "Still available?",
                    "last_message_at": "2024-05-01T09:30:00",
                    "announcement_title": "Dune"
                },
                {
                    "id": 1,
                    "other_user_id": 14,
                    "other_user_username": "karim",
                    "last_message": null,
                    "last_message_at": null
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), Some("secret-token"));
    let conversations = assert_ok!(client.list_conversations().await);

    let ids: Vec<_> = conversations.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![3, 1]);
    assert_eq!(conversations[0].announcement_title.as_deref(), Some("Dune"));
    assert_eq!(conversations[1].last_message, None);
}

#[tokio::test]
async fn test_list_messages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/messages/conversations/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{
                "id": 70,
                "conversation_id": 7,
                "sender_id": 12,
                "content": "Bonjour",
                "created_at": "2024-05-01T09:30:00"
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), Some("secret-token"));
    let messages = assert_ok!(client.list_messages(7).await);

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "Bonjour");
}

#[tokio::test]
async fn test_send_message_passes_content_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/messages/conversations/7/messages"))
        .and(query_param("content", "Prix final ? 5 €"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 71,
            "conversation_id": 7,
            "sender_id": 1,
            "content": "Prix final ? 5 €",
            "created_at": "2024-05-01T09:31:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), Some("secret-token"));
    let message = assert_ok!(client.send_message(7, "Prix final ? 5 €").await);

    assert_eq!(message.id, 71);
}

#[tokio::test]
async fn test_rejection_carries_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/messages/conversations/7/messages"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "detail": "Cannot send a message to yourself" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), Some("secret-token"));
    let error = client.send_message(7, "hi").await.unwrap_err();

    assert_eq!(
        error,
        SyncError::ServerRejection {
            status: 400,
            detail: "Cannot send a message to yourself".to_string(),
        }
    );
    assert!(!error.is_transient());
}

#[tokio::test]
async fn test_undecodable_body_is_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), Some("secret-token"));
    assert_err!(
        client.list_wishlist().await,
        SyncError::SerializationError { .. }
    );
}

#[tokio::test]
async fn test_list_wishlist_decodes_listing_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "announcement_id": 42,
                "announcement": {
                    "price": 1200.0,
                    "status": "Active",
                    "book": { "title": "L'Etranger", "cover_image_url": null }
                }
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), Some("secret-token"));
    let items = assert_ok!(client.list_wishlist().await);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].announcement_id, 42);
    assert_eq!(items[0].title(), Some("L'Etranger"));
    assert!(items[0].is_available());
}

#[tokio::test]
async fn test_add_to_wishlist_posts_listing_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/wishlist/"))
        .and(body_json(json!({ "announcement_id": 42 })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), Some("secret-token"));
    assert_ok!(client.add_to_wishlist(42).await);
}

#[tokio::test]
async fn test_remove_from_wishlist_deletes_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/wishlist/42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), Some("secret-token"));
    assert_ok!(client.remove_from_wishlist(42).await);
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/messages/conversations"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Not authenticated"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), None);
    assert_err!(
        client.list_conversations().await,
        SyncError::ServerRejection { status: 401, .. }
    );

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_unreachable_server_is_network_failure() {
    let client = client_for("http://127.0.0.1:9", Some("secret-token"));

    let error = client.list_conversations().await.unwrap_err();
    assert_matches!(&error, SyncError::NetworkFailure { .. });
    assert!(error.is_transient());
}
