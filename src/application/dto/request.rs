//! Request DTOs
//!
//! Data structures for API request bodies and query strings.

use serde::Deserialize;

/// Create message request
#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub body: String,
}

/// Query string of the message search endpoint
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}
