//! # Chat Service Library
//!
//! Chats numbered per application and messages numbered per chat, with:
//! - A RESTful HTTP API
//! - PostgreSQL as the entity store
//! - Redis for sequence counters and event streams
//! - Elasticsearch for full-text message search
//!
//! Numbers come from a durable per-scope counter. They are unique and may
//! have gaps. Search indexing and event publishing run in the background
//! after a write and never fail the request that caused them.
//!
//! ## Architecture
//!
//! - **Domain Layer**: Entities, collaborator contracts, classified errors
//! - **Application Layer**: Orchestrators, background fan-out, DTOs
//! - **Infrastructure Layer**: PostgreSQL, Redis, Elasticsearch and in-memory adapters
//! - **Presentation Layer**: HTTP routes, handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! chat_service/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects, collaborator traits
//! +-- application/    Services, fan-out dispatcher and DTOs
//! +-- infrastructure/ Store, counter, search and event adapters
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Error responses
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
