//! Message Handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::{CreateMessageRequest, SearchParams};
use crate::application::dto::response::{CreateMessageResponse, MessageResponse};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Create a message in a chat
pub async fn create_message(
    State(state): State<AppState>,
    Path((token, number)): Path<(String, String)>,
    body: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateMessageResponse>), AppError> {
    let Json(body) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected message payload");
        AppError::BadRequest("Invalid request payload".into())
    })?;

    let message = state
        .message_service
        .create_message(&token, &number, &body.body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateMessageResponse {
            message_number: message.number,
        }),
    ))
}

/// List the messages of a chat
pub async fn list_messages(
    State(state): State<AppState>,
    Path((token, number)): Path<(String, String)>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let messages = state.message_service.list_messages(&token, &number).await?;

    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// Full-text search within a chat
pub async fn search_messages(
    State(state): State<AppState>,
    Path((token, number)): Path<(String, String)>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let query = params.q.unwrap_or_default();
    let messages = state
        .message_service
        .search_messages(&token, &number, &query)
        .await?;

    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}
