//! # Domain Layer
//!
//! The domain layer holds the two entities this service owns and the
//! contracts of every collaborator it talks to.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Chat and Message with their repository traits
//! - **value_objects**: Scope keys and parsed chat numbers
//! - **services**: Sequence allocator, search index and event publisher contracts
//! - **errors**: Classified collaborator failures
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository and collaborator traits define data access contracts
//! - Collaborator failures are classified before they leave an adapter

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use errors::*;
pub use services::*;
pub use value_objects::*;
