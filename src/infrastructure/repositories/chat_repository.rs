//! Chat Repository Implementation
//!
//! PostgreSQL implementation of the ChatRepository trait.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use crate::domain::{Chat, ChatRepository, NewChat, StoreError};
use crate::infrastructure::metrics;

/// Database row representation of the chats table.
#[derive(Debug, sqlx::FromRow)]
struct ChatRow {
    id: i64,
    application_id: String,
    number: i64,
    messages_count: i64,
    created_at: DateTime<Utc>,
}

impl ChatRow {
    fn into_chat(self) -> Chat {
        Chat {
            id: self.id,
            application_id: self.application_id,
            number: self.number,
            messages_count: self.messages_count,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL chat repository.
#[derive(Debug, Clone)]
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    #[instrument(skip(self, chat), fields(application_id = %chat.application_id, number = chat.number))]
    async fn insert(&self, chat: NewChat) -> Result<Chat, StoreError> {
        let started = Instant::now();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO chats (application_id, number, messages_count, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&chat.application_id)
        .bind(chat.number)
        .bind(chat.messages_count)
        .bind(chat.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::write("chat", e))?;
        metrics::record_db_query("insert", "chats", started.elapsed().as_secs_f64());

        Ok(chat.into_chat(id))
    }

    #[instrument(skip(self))]
    async fn find_by_application_and_number(
        &self,
        application_id: &str,
        number: i64,
    ) -> Result<Option<Chat>, StoreError> {
        let started = Instant::now();
        let row = sqlx::query_as::<_, ChatRow>(
            r#"
            SELECT id, application_id, number, messages_count, created_at
            FROM chats
            WHERE application_id = $1 AND number = $2
            "#,
        )
        .bind(application_id)
        .bind(number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::lookup("find_chat", e))?;
        metrics::record_db_query("select", "chats", started.elapsed().as_secs_f64());

        Ok(row.map(ChatRow::into_chat))
    }

    #[instrument(skip(self))]
    async fn list_by_application(&self, application_id: &str) -> Result<Vec<Chat>, StoreError> {
        let started = Instant::now();
        let rows = sqlx::query_as::<_, ChatRow>(
            r#"
            SELECT id, application_id, number, messages_count, created_at
            FROM chats
            WHERE application_id = $1
            ORDER BY number ASC
            "#,
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::lookup("list_chats", e))?;
        metrics::record_db_query("select", "chats", started.elapsed().as_secs_f64());

        Ok(rows.into_iter().map(ChatRow::into_chat).collect())
    }
}
