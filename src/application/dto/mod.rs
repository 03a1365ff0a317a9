//! Data Transfer Objects
//!
//! DTOs for API request/response serialization.

pub mod request;
pub mod response;

pub use request::{CreateMessageRequest, SearchParams};
pub use response::{ChatResponse, CreateChatResponse, CreateMessageResponse, MessageResponse};
