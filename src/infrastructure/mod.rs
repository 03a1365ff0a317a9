//! Infrastructure Layer
//!
//! Adapters for the collaborators named in the domain layer:
//! - Database repositories (PostgreSQL)
//! - Sequence counters and event streams (Redis)
//! - Full-text search (Elasticsearch)
//! - In-memory stand-ins for all of the above
//! - Prometheus metrics
//! - Readiness probes

pub mod database;
pub mod health;
pub mod memory;
pub mod metrics;
pub mod redis;
pub mod repositories;
pub mod search;
