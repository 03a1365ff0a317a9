//! Event bus contract and the facts this service emits.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::entities::{Chat, Message};
use crate::domain::errors::PublishError;

/// A fact about a newly persisted entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DomainEvent {
    ChatCreated(Chat),
    MessageCreated(Message),
}

impl DomainEvent {
    /// Short name used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ChatCreated(_) => "chat_created",
            Self::MessageCreated(_) => "message_created",
        }
    }

    /// JSON payload as published on the bus: the entity itself.
    pub fn payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Topic names for the two event kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTopics {
    pub chat_created: String,
    pub message_created: String,
}

impl EventTopics {
    pub fn topic_for(&self, event: &DomainEvent) -> &str {
        match event {
            DomainEvent::ChatCreated(_) => &self.chat_created,
            DomainEvent::MessageCreated(_) => &self.message_created,
        }
    }
}

impl Default for EventTopics {
    fn default() -> Self {
        Self {
            chat_created: "chat_created".to_string(),
            message_created: "message_created".to_string(),
        }
    }
}

/// At-least-once delivery of events to a named topic.
///
/// `Ok` means the broker acknowledged and durably holds the event.
/// No ordering is promised, within or across topics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, event: &DomainEvent) -> Result<(), PublishError>;
}
