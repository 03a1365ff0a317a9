//! Chat API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{body_json, unique_token, TestApp};

#[tokio::test]
async fn test_create_chat_returns_first_number() {
    let app = TestApp::new().await;
    let token = unique_token();

    let response = app.post(&format!("/applications/{}/chats", token)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await, serde_json::json!({ "chat_number": 1 }));
}

#[tokio::test]
async fn test_chat_numbers_are_scoped_per_application() {
    let app = TestApp::new().await;
    let first = unique_token();
    let second = unique_token();

    assert_eq!(app.create_chat(&first).await, 1);
    assert_eq!(app.create_chat(&first).await, 2);
    assert_eq!(app.create_chat(&second).await, 1);
}

#[tokio::test]
async fn test_list_chats_ascending_with_listing_shape() {
    let app = TestApp::new().await;
    let token = unique_token();
    for _ in 0..3 {
        app.create_chat(&token).await;
    }

    let response = app.get(&format!("/applications/{}/chats", token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let chats = body_json(response).await;

    let numbers: Vec<i64> = chats
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(chats[0]["messages_count"], 0);
    assert!(chats[0]["created_at"].is_string());
    assert!(chats[0].get("id").is_none());
}

#[tokio::test]
async fn test_list_chats_of_unknown_application_is_empty() {
    let app = TestApp::new().await;

    let response = app.get(&format!("/applications/{}/chats", unique_token())).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn test_allocator_outage_is_server_error() {
    let app = TestApp::new().await;
    app.backends.allocator.set_unavailable(true);

    let response = app.post(&format!("/applications/{}/chats", unique_token())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], 10000);
    assert_eq!(body["message"], "Internal server error");
    assert!(app.backends.chats.is_empty());
}

#[tokio::test]
async fn test_chat_created_event_is_published() {
    let mut app = TestApp::new().await;
    let token = unique_token();
    app.create_chat(&token).await;

    app.drain().await;

    let events = app.backends.publisher.on_topic("chat_created");
    assert_eq!(events.len(), 1);
    let payload: serde_json::Value = serde_json::from_str(&events[0].payload().unwrap()).unwrap();
    assert_eq!(payload["application_id"], token.as_str());
    assert_eq!(payload["number"], 1);
}
