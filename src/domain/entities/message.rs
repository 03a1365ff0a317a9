//! Message entity and repository trait.
//!
//! Maps to the `messages` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::StoreError;

/// Represents a message in a chat.
///
/// Maps to the `messages` table:
/// - id: BIGSERIAL PRIMARY KEY (store-assigned)
/// - chat_id: BIGINT NOT NULL REFERENCES chats(id)
/// - number: BIGINT NOT NULL, unique per chat_id
/// - body: TEXT NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL
///
/// The serialized form is also the search document and the
/// `message_created` event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Store-assigned identity
    pub id: i64,

    /// Owning chat's store id
    pub chat_id: i64,

    /// Sequence number within the chat, starting at 1
    pub number: i64,

    /// Message text, caller-supplied
    pub body: String,

    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Identifier used for the search document.
    pub fn document_id(&self) -> String {
        self.id.to_string()
    }
}

/// A message that has a number but no store identity yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub chat_id: i64,
    pub number: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl NewMessage {
    pub fn new(chat_id: i64, number: i64, body: impl Into<String>) -> Self {
        Self {
            chat_id,
            number,
            body: body.into(),
            created_at: super::stored_now(),
        }
    }

    pub fn into_message(self, id: i64) -> Message {
        Message {
            id,
            chat_id: self.chat_id,
            number: self.number,
            body: self.body,
            created_at: self.created_at,
        }
    }
}

/// Repository trait for Message data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a new message and return it with its assigned id.
    async fn insert(&self, message: NewMessage) -> Result<Message, StoreError>;

    /// List the messages of a chat ordered by number ascending.
    ///
    /// A chat without messages yields an empty vector.
    async fn list_by_chat(&self, chat_id: i64) -> Result<Vec<Message>, StoreError>;
}
