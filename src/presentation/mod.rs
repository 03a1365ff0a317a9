//! Presentation Layer
//!
//! HTTP routes, handlers and Tower middleware.

pub mod http;
pub mod middleware;
