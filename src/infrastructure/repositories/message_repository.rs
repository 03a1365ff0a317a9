//! Message Repository Implementation
//!
//! PostgreSQL implementation of the MessageRepository trait.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use crate::domain::{Message, MessageRepository, NewMessage, StoreError};
use crate::infrastructure::metrics;

/// Internal row type for message queries.
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    chat_id: i64,
    number: i64,
    body: String,
    created_at: DateTime<Utc>,
}

impl MessageRow {
    fn into_message(self) -> Message {
        Message {
            id: self.id,
            chat_id: self.chat_id,
            number: self.number,
            body: self.body,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL message repository.
#[derive(Debug, Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self, message), fields(chat_id = message.chat_id, number = message.number))]
    async fn insert(&self, message: NewMessage) -> Result<Message, StoreError> {
        let started = Instant::now();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO messages (chat_id, number, body, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(message.chat_id)
        .bind(message.number)
        .bind(&message.body)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::write("message", e))?;
        metrics::record_db_query("insert", "messages", started.elapsed().as_secs_f64());

        Ok(message.into_message(id))
    }

    #[instrument(skip(self))]
    async fn list_by_chat(&self, chat_id: i64) -> Result<Vec<Message>, StoreError> {
        let started = Instant::now();
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, chat_id, number, body, created_at
            FROM messages
            WHERE chat_id = $1
            ORDER BY number ASC
            "#,
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::lookup("list_messages", e))?;
        metrics::record_db_query("select", "messages", started.elapsed().as_secs_f64());

        Ok(rows.into_iter().map(MessageRow::into_message).collect())
    }
}
