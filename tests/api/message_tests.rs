//! Message API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{body_json, eventually, unique_token, TestApp};

fn messages_uri(token: &str, chat: impl std::fmt::Display) -> String {
    format!("/applications/{}/chats/{}/messages", token, chat)
}

#[tokio::test]
async fn test_message_numbers_are_scoped_per_chat() {
    let app = TestApp::new().await;
    let token = unique_token();
    let first = app.create_chat(&token).await;
    let second = app.create_chat(&token).await;

    assert_eq!(app.create_message(&token, first, "a").await, 1);
    assert_eq!(app.create_message(&token, first, "b").await, 2);
    assert_eq!(app.create_message(&token, second, "c").await, 1);
}

#[tokio::test]
async fn test_create_message_in_missing_chat_is_not_found() {
    let app = TestApp::new().await;
    let token = unique_token();
    app.create_chat(&token).await;

    let response = app
        .post_json(&messages_uri(&token, 7), r#"{"body":"hello"}"#)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], 10001);
    assert!(app.backends.messages.is_empty());
}

#[tokio::test]
async fn test_non_numeric_chat_number_is_bad_request() {
    let app = TestApp::new().await;

    let response = app.get(&messages_uri(&unique_token(), "abc")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_payload_is_bad_request() {
    let app = TestApp::new().await;
    let token = unique_token();
    let chat = app.create_chat(&token).await;

    let response = app.post_json(&messages_uri(&token, chat), "{not json").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid request payload");
}

#[tokio::test]
async fn test_list_messages_shape_and_order() {
    let app = TestApp::new().await;
    let token = unique_token();
    let chat = app.create_chat(&token).await;
    app.create_message(&token, chat, "first").await;
    app.create_message(&token, chat, "second").await;

    let response = app.get(&messages_uri(&token, chat)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let messages = body_json(response).await;

    assert_eq!(messages[0]["number"], 1);
    assert_eq!(messages[0]["body"], "first");
    assert_eq!(messages[1]["number"], 2);
    assert!(messages[0]["chat_id"].is_i64());
    assert!(messages[0]["created_at"].is_string());
}

#[tokio::test]
async fn test_list_messages_of_empty_chat() {
    let app = TestApp::new().await;
    let token = unique_token();
    let chat = app.create_chat(&token).await;

    let response = app.get(&messages_uri(&token, chat)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn test_search_returns_matches_most_recent_first() {
    let app = TestApp::new().await;
    let token = unique_token();
    let chat = app.create_chat(&token).await;
    app.create_message(&token, chat, "welcome aboard").await;
    app.create_message(&token, chat, "unrelated").await;
    app.create_message(&token, chat, "Welcome to instabug!!").await;
    assert!(eventually(|| app.backends.search_index.document_count("messages") == 3).await);

    let response = app
        .get(&format!("{}/search?q=welcome", messages_uri(&token, chat)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let hits = body_json(response).await;

    let bodies: Vec<&str> = hits
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, vec!["Welcome to instabug!!", "welcome aboard"]);
}

#[tokio::test]
async fn test_search_does_not_cross_chats() {
    let app = TestApp::new().await;
    let token = unique_token();
    let first = app.create_chat(&token).await;
    let second = app.create_chat(&token).await;
    app.create_message(&token, first, "hello there").await;
    app.create_message(&token, second, "hello elsewhere").await;
    assert!(eventually(|| app.backends.search_index.document_count("messages") == 2).await);

    let response = app
        .get(&format!("{}/search?q=hello", messages_uri(&token, first)))
        .await;
    let hits = body_json(response).await;

    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["body"], "hello there");
}

#[tokio::test]
async fn test_search_without_query_is_bad_request() {
    let app = TestApp::new().await;
    let token = unique_token();
    let chat = app.create_chat(&token).await;

    let missing = app.get(&format!("{}/search", messages_uri(&token, chat))).await;
    let blank = app.get(&format!("{}/search?q=", messages_uri(&token, chat))).await;

    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_outage_is_server_error() {
    let app = TestApp::new().await;
    let token = unique_token();
    let chat = app.create_chat(&token).await;
    app.backends.search_index.set_search_failing(true);

    let response = app
        .get(&format!("{}/search?q=hello", messages_uri(&token, chat)))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_message_created_event_carries_message() {
    let mut app = TestApp::new().await;
    let token = unique_token();
    let chat = app.create_chat(&token).await;
    app.create_message(&token, chat, "ping").await;

    app.drain().await;

    let events = app.backends.publisher.on_topic("message_created");
    assert_eq!(events.len(), 1);
    let payload: serde_json::Value = serde_json::from_str(&events[0].payload().unwrap()).unwrap();
    assert_eq!(payload["body"], "ping");
    assert_eq!(payload["number"], 1);
}

#[tokio::test]
async fn test_unreachable_chat_store_is_server_error() {
    let app = TestApp::new().await;
    let token = unique_token();
    let chat = app.create_chat(&token).await;
    app.backends.chats.set_reads_failing(true);

    let created = app
        .post_json(&messages_uri(&token, chat), r#"{"body":"hello"}"#)
        .await;
    let listed = app.get(&messages_uri(&token, chat)).await;

    assert_eq!(created.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(created).await["code"], 10000);
    assert_eq!(listed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app.backends.messages.is_empty());
}

#[tokio::test]
async fn test_message_write_failure_is_server_error() {
    let app = TestApp::new().await;
    let token = unique_token();
    let chat = app.create_chat(&token).await;
    app.backends.messages.set_writes_failing(true);

    let failed = app
        .post_json(&messages_uri(&token, chat), r#"{"body":"lost"}"#)
        .await;
    app.backends.messages.set_writes_failing(false);

    assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.create_message(&token, chat, "kept").await, 2);
}

#[tokio::test]
async fn test_unreachable_message_store_fails_listing() {
    let app = TestApp::new().await;
    let token = unique_token();
    let chat = app.create_chat(&token).await;
    app.create_message(&token, chat, "hello").await;
    app.backends.messages.set_reads_failing(true);

    let response = app.get(&messages_uri(&token, chat)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_allocator_outage_fails_message_creation() {
    let app = TestApp::new().await;
    let token = unique_token();
    let chat = app.create_chat(&token).await;
    app.backends.allocator.set_unavailable(true);

    let response = app
        .post_json(&messages_uri(&token, chat), r#"{"body":"hello"}"#)
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app.backends.messages.is_empty());
}
