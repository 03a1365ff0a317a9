//! Chat Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::response::{ChatResponse, CreateChatResponse};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Create a chat under an application
pub async fn create_chat(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<(StatusCode, Json<CreateChatResponse>), AppError> {
    let chat = state.chat_service.create_chat(&token).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateChatResponse {
            chat_number: chat.number,
        }),
    ))
}

/// List the chats of an application
pub async fn list_chats(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Vec<ChatResponse>>, AppError> {
    let chats = state.chat_service.list_chats(&token).await?;

    Ok(Json(chats.into_iter().map(ChatResponse::from).collect()))
}
