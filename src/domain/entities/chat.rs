//! Chat entity and repository trait.
//!
//! Maps to the `chats` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::StoreError;

/// A chat owned by an application.
///
/// Maps to the `chats` table:
/// - id: BIGSERIAL PRIMARY KEY (store-assigned)
/// - application_id: TEXT NOT NULL (application token)
/// - number: BIGINT NOT NULL, unique per application_id
/// - messages_count: BIGINT NOT NULL DEFAULT 0
/// - created_at: TIMESTAMPTZ NOT NULL
///
/// Chats are append-only: once inserted they are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// Store-assigned identity
    pub id: i64,

    /// Owning application (tenant)
    pub application_id: String,

    /// Sequence number within the application, starting at 1
    pub number: i64,

    /// Denormalized message counter, written as 0 at creation
    pub messages_count: i64,

    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
}

/// A chat that has a number but no store identity yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChat {
    pub application_id: String,
    pub number: i64,
    pub messages_count: i64,
    pub created_at: DateTime<Utc>,
}

impl NewChat {
    /// Build the record for a freshly allocated chat number.
    pub fn new(application_id: impl Into<String>, number: i64) -> Self {
        Self {
            application_id: application_id.into(),
            number,
            messages_count: 0,
            created_at: super::stored_now(),
        }
    }

    /// Attach the identity assigned by the store.
    pub fn into_chat(self, id: i64) -> Chat {
        Chat {
            id,
            application_id: self.application_id,
            number: self.number,
            messages_count: self.messages_count,
            created_at: self.created_at,
        }
    }
}

/// Repository trait for Chat data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Persist a new chat and return it with its assigned id.
    async fn insert(&self, chat: NewChat) -> Result<Chat, StoreError>;

    /// Find a chat by application and number.
    ///
    /// `Ok(None)` means the chat does not exist; `Err` means the store
    /// could not answer.
    async fn find_by_application_and_number(
        &self,
        application_id: &str,
        number: i64,
    ) -> Result<Option<Chat>, StoreError>;

    /// List all chats of an application ordered by number ascending.
    async fn list_by_application(&self, application_id: &str) -> Result<Vec<Chat>, StoreError>;
}
