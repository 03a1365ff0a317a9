//! Application Layer
//!
//! Contains the orchestrators, the background fan-out of their side effects,
//! and data transfer objects (DTOs). This layer orchestrates the flow of
//! data between the presentation and domain layers.

pub mod dto;
pub mod fanout;
pub mod services;
