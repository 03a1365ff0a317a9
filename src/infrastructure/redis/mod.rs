//! Redis Module
//!
//! Redis backs two collaborators of the service:
//!
//! - `RedisSequenceAllocator`: one counter per scope, advanced with `INCR`
//! - `RedisStreamPublisher`: one stream per topic, appended with `XADD`
//!
//! Both share a single auto-reconnecting `ConnectionManager`.
//!
//! # Example
//!
//! ```rust,ignore
//! use chat_service::infrastructure::redis::{create_redis_client, RedisSequenceAllocator};
//!
//! let conn = create_redis_client(&settings.redis).await?;
//! let allocator = RedisSequenceAllocator::new(conn);
//! let number = allocator.next(&ScopeKey::chats("token-1")).await?;
//! ```

mod sequence;
mod streams;

pub use sequence::RedisSequenceAllocator;
pub use streams::RedisStreamPublisher;

use redis::aio::ConnectionManager;
use redis::{Client, RedisError};
use tracing::{info, instrument};

use crate::config::RedisSettings;

/// Creates a Redis connection manager with automatic reconnection.
#[instrument(skip(settings), fields(url = %settings.url))]
pub async fn create_redis_client(settings: &RedisSettings) -> Result<ConnectionManager, RedisError> {
    info!("Connecting to Redis...");
    let client = Client::open(settings.url.as_str())?;
    let manager = ConnectionManager::new(client).await?;
    info!("Redis connection established");
    Ok(manager)
}

/// True when the failure means Redis could not be reached at all.
pub(crate) fn is_unreachable(err: &RedisError) -> bool {
    err.is_io_error() || err.is_timeout() || err.is_connection_dropped() || err.is_connection_refusal()
}
