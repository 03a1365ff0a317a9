//! Redis-backed sequence allocator.

use std::sync::Arc;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, error, instrument};

use crate::domain::{AllocationError, ScopeKey, SequenceAllocator};
use crate::infrastructure::metrics;

/// Allocates numbers with `INCR` on one key per scope.
///
/// `INCR` creates a missing key at 0 before incrementing, so the first
/// number of every scope is 1, and Redis serializes concurrent increments
/// on the same key. The key survives restarts as long as Redis persistence
/// is enabled.
#[derive(Clone)]
pub struct RedisSequenceAllocator {
    conn: ConnectionManager,
    prefix: Option<Arc<str>>,
}

impl RedisSequenceAllocator {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn, prefix: None }
    }

    /// All counter keys are prefixed, e.g. for a shared Redis instance.
    pub fn with_prefix(conn: ConnectionManager, prefix: impl Into<Arc<str>>) -> Self {
        Self {
            conn,
            prefix: Some(prefix.into()),
        }
    }

    fn format_key(&self, scope: &ScopeKey) -> String {
        format_key(self.prefix.as_deref(), scope)
    }
}

fn format_key(prefix: Option<&str>, scope: &ScopeKey) -> String {
    match prefix {
        Some(prefix) => format!("{}{}", prefix, scope),
        None => scope.to_string(),
    }
}

#[async_trait]
impl SequenceAllocator for RedisSequenceAllocator {
    #[instrument(skip(self), fields(scope = %scope))]
    async fn next(&self, scope: &ScopeKey) -> Result<i64, AllocationError> {
        let key = self.format_key(scope);
        let mut conn = self.conn.clone();

        match conn.incr::<_, _, i64>(&key, 1).await {
            Ok(value) => {
                debug!(key = %key, value, "Sequence number allocated");
                metrics::record_allocation(scope.kind().as_str(), "allocated");
                Ok(value)
            }
            Err(e) => {
                error!(key = %key, error = %e, "Sequence allocation failed");
                metrics::record_allocation(scope.kind().as_str(), "unavailable");
                Err(AllocationError::Unavailable {
                    scope: scope.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}

impl std::fmt::Debug for RedisSequenceAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSequenceAllocator")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
