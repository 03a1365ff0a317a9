//! Full-text search contract over message bodies.

use async_trait::async_trait;

use crate::domain::entities::Message;
use crate::domain::errors::{IndexError, SearchError};

/// Result ordering of a message query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchSort {
    /// Most recent `created_at` first
    #[default]
    CreatedAtDesc,
}

/// Structured message query: text match on `body` AND exact `chat_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageQuery {
    pub text: String,
    pub chat_id: i64,
    pub sort: SearchSort,
    pub limit: usize,
}

impl MessageQuery {
    pub fn new(text: impl Into<String>, chat_id: i64, limit: usize) -> Self {
        Self {
            text: text.into(),
            chat_id,
            sort: SearchSort::CreatedAtDesc,
            limit,
        }
    }
}

/// Eventually consistent projection of messages for full-text queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Upsert a message document. Callers treat failure as non-fatal.
    async fn index(
        &self,
        collection: &str,
        document_id: &str,
        document: &Message,
    ) -> Result<(), IndexError>;

    /// Run a message query. Failure is surfaced to the caller.
    async fn search(
        &self,
        collection: &str,
        query: &MessageQuery,
    ) -> Result<Vec<Message>, SearchError>;
}
