//! Dependency Probes
//!
//! Connectivity checks the readiness endpoint runs against each external
//! collaborator.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use sqlx::PgPool;

use crate::infrastructure::search::ElasticsearchIndex;

/// A reachability check of one collaborator.
#[async_trait]
pub trait DependencyProbe: Send + Sync {
    /// Name shown in the readiness report.
    fn name(&self) -> &'static str;

    /// Whether the service cannot accept writes without this dependency.
    fn critical(&self) -> bool;

    async fn check(&self) -> Result<(), String>;
}

/// Relational store probe
pub struct PostgresProbe {
    pool: PgPool,
}

impl PostgresProbe {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DependencyProbe for PostgresProbe {
    fn name(&self) -> &'static str {
        "database"
    }

    fn critical(&self) -> bool {
        true
    }

    async fn check(&self) -> Result<(), String> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| format!("Database connection failed: {}", e))
    }
}

/// Sequence store and event bus probe
pub struct RedisProbe {
    conn: ConnectionManager,
}

impl RedisProbe {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl DependencyProbe for RedisProbe {
    fn name(&self) -> &'static str {
        "redis"
    }

    // Chat and message numbers come from Redis.
    fn critical(&self) -> bool {
        true
    }

    async fn check(&self) -> Result<(), String> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| format!("Redis connection failed: {}", e))?;
        Ok(())
    }
}

/// Search engine probe
pub struct SearchProbe {
    index: ElasticsearchIndex,
}

impl SearchProbe {
    pub fn new(index: ElasticsearchIndex) -> Self {
        Self { index }
    }
}

#[async_trait]
impl DependencyProbe for SearchProbe {
    fn name(&self) -> &'static str {
        "search"
    }

    fn critical(&self) -> bool {
        false
    }

    async fn check(&self) -> Result<(), String> {
        self.index.ping().await.map_err(|e| e.to_string())
    }
}
