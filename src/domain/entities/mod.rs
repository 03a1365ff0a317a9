//! # Domain Entities
//!
//! The two records this service owns. Both map directly to their database
//! tables and are append-only.
//!
//! - **Chat**: a conversation numbered per application
//! - **Message**: a text entry numbered per chat
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod chat;
mod message;

use chrono::{DateTime, SubsecRound, Utc};

/// Current time at the precision `TIMESTAMPTZ` keeps, so the value handed
/// back, indexed and published equals the one later read from the store.
pub(crate) fn stored_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub use chat::{Chat, ChatRepository, NewChat};
pub use message::{Message, MessageRepository, NewMessage};

#[cfg(test)]
pub use chat::MockChatRepository;
#[cfg(test)]
pub use message::MockMessageRepository;
