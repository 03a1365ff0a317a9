//! Response DTOs
//!
//! Data structures for API response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Chat, Message};

/// Chat creation response
#[derive(Debug, Serialize)]
pub struct CreateChatResponse {
    pub chat_number: i64,
}

/// Chat listing entry
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub number: i64,
    pub messages_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Chat> for ChatResponse {
    fn from(chat: Chat) -> Self {
        Self {
            number: chat.number,
            messages_count: chat.messages_count,
            created_at: chat.created_at,
        }
    }
}

/// Message creation response
#[derive(Debug, Serialize)]
pub struct CreateMessageResponse {
    pub message_number: i64,
}

/// Message listing and search entry
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: i64,
    pub chat_id: i64,
    pub number: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            chat_id: message.chat_id,
            number: message.number,
            body: message.body,
            created_at: message.created_at,
        }
    }
}
