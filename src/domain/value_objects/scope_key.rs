//! Sequence scope keys.
//!
//! A scope key names one independent counter in the sequence store. Chat
//! numbers are scoped per application, message numbers per chat.
//!
//! ```text
//! app:{application_id}:chat_seq   -> next chat number
//! chat:{chat_id}:msg_seq          -> next message number
//! ```

use std::fmt;

/// What a counter numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Chats,
    Messages,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chats => "chats",
            Self::Messages => "messages",
        }
    }
}

/// Identifier of one sequence counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey {
    kind: ScopeKind,
    key: String,
}

impl ScopeKey {
    /// Counter for chat numbers of an application.
    pub fn chats(application_id: &str) -> Self {
        Self {
            kind: ScopeKind::Chats,
            key: format!("app:{}:chat_seq", application_id),
        }
    }

    /// Counter for message numbers of a chat, keyed by the chat's store id.
    pub fn messages(chat_id: i64) -> Self {
        Self {
            kind: ScopeKind::Messages,
            key: format!("chat:{}:msg_seq", chat_id),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
