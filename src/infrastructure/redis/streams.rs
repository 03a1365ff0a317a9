//! Event publishing on Redis Streams.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::{debug, instrument, warn};

use super::is_unreachable;
use crate::domain::{DomainEvent, EventPublisher, PublishError};

/// Field holding the JSON entity in every stream entry.
pub const PAYLOAD_FIELD: &str = "payload";

/// Publishes each event as an entry on the stream named after its topic.
///
/// `XADD` returns only after the entry is appended, which is the
/// acknowledgment `EventPublisher` requires. Streams are trimmed
/// approximately to `max_len` entries; consumers read them with consumer
/// groups and get at-least-once delivery.
#[derive(Clone)]
pub struct RedisStreamPublisher {
    conn: ConnectionManager,
    max_len: usize,
}

impl RedisStreamPublisher {
    pub fn new(conn: ConnectionManager, max_len: usize) -> Self {
        Self { conn, max_len }
    }
}

fn xadd_command(topic: &str, max_len: usize, payload: &str) -> redis::Cmd {
    let mut cmd = redis::cmd("XADD");
    cmd.arg(topic)
        .arg("MAXLEN")
        .arg("~")
        .arg(max_len)
        .arg("*")
        .arg(PAYLOAD_FIELD)
        .arg(payload);
    cmd
}

#[async_trait]
impl EventPublisher for RedisStreamPublisher {
    #[instrument(skip(self, event), fields(topic = %topic, kind = event.kind()))]
    async fn publish(&self, topic: &str, event: &DomainEvent) -> Result<(), PublishError> {
        let payload = event.payload().map_err(|e| PublishError::Rejected {
            topic: topic.to_string(),
            message: e.to_string(),
        })?;

        let mut conn = self.conn.clone();
        let entry_id: String = xadd_command(topic, self.max_len, &payload)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                warn!(error = %e, "XADD failed");
                if is_unreachable(&e) {
                    PublishError::Unavailable {
                        topic: topic.to_string(),
                        message: e.to_string(),
                    }
                } else {
                    PublishError::Rejected {
                        topic: topic.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        debug!(entry_id = %entry_id, "Event appended to stream");
        Ok(())
    }
}

impl std::fmt::Debug for RedisStreamPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStreamPublisher")
            .field("max_len", &self.max_len)
            .finish_non_exhaustive()
    }
}
