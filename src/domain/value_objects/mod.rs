//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **ScopeKey**: names one sequence counter (per application or per chat)
//! - **ChatNumber**: a chat number parsed from caller-supplied text

mod chat_number;
mod scope_key;

pub use chat_number::*;
pub use scope_key::*;
