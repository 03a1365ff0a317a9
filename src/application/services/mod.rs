//! Application Services
//!
//! The orchestrators behind the HTTP API.
//!
//! ## Available Services
//!
//! - **ChatService**: Chat creation and listing per application
//! - **MessageService**: Message creation, listing and search per chat

pub mod chat_service;
mod errors;
pub mod message_service;

pub use chat_service::{ChatError, ChatService, ChatServiceImpl};
pub use errors::CreationFailure;
pub use message_service::{MessageError, MessageService, MessageServiceImpl, SearchOptions};
