//! Creation flows against degraded collaborators

use chat_service::application::services::{ChatError, CreationFailure, MessageError};
use chat_service::domain::{MessageRepository, NewMessage, ScopeKey};
use pretty_assertions::assert_eq;

use crate::common::{eventually, unique_token, TestApp};

#[tokio::test]
async fn test_failed_write_leaves_gap_not_duplicate() {
    let app = TestApp::new().await;
    let token = unique_token();
    let chats = &app.state.chat_service;

    assert_eq!(chats.create_chat(&token).await.unwrap().number, 1);
    app.backends.chats.set_writes_failing(true);
    let err = chats.create_chat(&token).await.unwrap_err();
    app.backends.chats.set_writes_failing(false);
    assert_eq!(chats.create_chat(&token).await.unwrap().number, 3);

    assert!(matches!(
        err,
        ChatError::CreationFailed(CreationFailure::WriteFailure(_))
    ));
    let numbers: Vec<i64> = chats
        .list_chats(&token)
        .await
        .unwrap()
        .iter()
        .map(|c| c.number)
        .collect();
    assert_eq!(numbers, vec![1, 3]);
}

#[tokio::test]
async fn test_missing_chat_never_consumes_a_message_number() {
    let app = TestApp::new().await;
    let token = unique_token();
    let chat = app.state.chat_service.create_chat(&token).await.unwrap();

    let err = app
        .state
        .message_service
        .create_message(&token, "2", "hello")
        .await
        .unwrap_err();

    assert!(matches!(err, MessageError::ChatNotFound { number: 2, .. }));
    assert_eq!(app.backends.allocator.current(&ScopeKey::messages(chat.id)), 0);
    assert_eq!(app.backends.allocator.current(&ScopeKey::messages(chat.id + 1)), 0);
}

#[tokio::test]
async fn test_index_failure_does_not_fail_message_creation() {
    let mut app = TestApp::new().await;
    let token = unique_token();
    app.state.chat_service.create_chat(&token).await.unwrap();
    app.backends.search_index.set_indexing_failing(true);

    let message = app
        .state
        .message_service
        .create_message(&token, "1", "still stored")
        .await
        .unwrap();

    assert_eq!(message.number, 1);
    app.drain().await;
    assert_eq!(app.backends.search_index.document_count("messages"), 0);
    assert_eq!(app.backends.publisher.on_topic("message_created").len(), 1);
    let listed = app
        .state
        .message_service
        .list_messages(&token, "1")
        .await
        .unwrap();
    assert_eq!(listed, vec![message]);
}

#[tokio::test]
async fn test_publish_failure_keeps_chat_listed() {
    let mut app = TestApp::new().await;
    let token = unique_token();
    app.backends.publisher.set_unavailable(true);

    let chat = app.state.chat_service.create_chat(&token).await.unwrap();

    app.drain().await;
    assert!(app.backends.publisher.published().is_empty());
    assert_eq!(
        app.state.chat_service.list_chats(&token).await.unwrap(),
        vec![chat]
    );
}

#[tokio::test]
async fn test_messages_listed_by_number_regardless_of_insert_order() {
    let app = TestApp::new().await;
    let token = unique_token();
    let chat = app.state.chat_service.create_chat(&token).await.unwrap();
    for (number, body) in [(3, "third"), (1, "first"), (2, "second")] {
        app.backends
            .messages
            .insert(NewMessage::new(chat.id, number, body))
            .await
            .unwrap();
    }

    let listed = app
        .state
        .message_service
        .list_messages(&token, "1")
        .await
        .unwrap();

    let numbers: Vec<i64> = listed.iter().map(|m| m.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_concurrent_message_creation_is_gapless_without_failures() {
    let app = TestApp::new().await;
    let token = unique_token();
    app.state.chat_service.create_chat(&token).await.unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..50 {
        let service = app.state.message_service.clone();
        let token = token.clone();
        tasks.spawn(async move { service.create_message(&token, "1", &format!("m{}", i)).await });
    }
    let mut numbers = Vec::new();
    while let Some(result) = tasks.join_next().await {
        numbers.push(result.unwrap().unwrap().number);
    }
    numbers.sort_unstable();

    assert_eq!(numbers, (1..=50).collect::<Vec<i64>>());
    assert!(eventually(|| app.backends.search_index.document_count("messages") == 50).await);
}
