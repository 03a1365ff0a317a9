//! # Domain Services
//!
//! Contracts for the collaborators the orchestrators compose. Each one is
//! an independently failing external system; the infrastructure layer
//! provides the concrete adapters.
//!
//! ## Services
//!
//! - **SequenceAllocator**: durable per-scope counters
//! - **SearchIndex**: full-text projection of message bodies
//! - **EventPublisher**: at-least-once delivery of created-entity facts

mod event_publisher;
mod search_index;
mod sequence_allocator;

pub use event_publisher::*;
pub use search_index::*;
pub use sequence_allocator::*;
