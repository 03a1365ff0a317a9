use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::FailureSwitch;
use crate::domain::{DomainEvent, EventPublisher, PublishError};

/// Events kept by default; older ones are discarded first.
pub const DEFAULT_RETAINED_EVENTS: usize = 10_000;

/// Records acknowledged events with their topic, keeping the most recent
/// `retained` of them like a trimmed stream.
#[derive(Debug)]
pub struct InMemoryEventPublisher {
    published: RwLock<VecDeque<(String, DomainEvent)>>,
    retained: usize,
    failing: FailureSwitch,
}

impl Default for InMemoryEventPublisher {
    fn default() -> Self {
        Self::with_retention(DEFAULT_RETAINED_EVENTS)
    }
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retained: usize) -> Self {
        Self {
            published: RwLock::new(VecDeque::new()),
            retained: retained.max(1),
            failing: FailureSwitch::default(),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.failing.set(unavailable);
    }

    /// Snapshot of retained events in acknowledgment order.
    pub fn published(&self) -> Vec<(String, DomainEvent)> {
        self.published.read().iter().cloned().collect()
    }

    /// Retained events published on one topic.
    pub fn on_topic(&self, topic: &str) -> Vec<DomainEvent> {
        self.published
            .read()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, e)| e.clone())
            .collect()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, topic: &str, event: &DomainEvent) -> Result<(), PublishError> {
        if self.failing.is_on() {
            return Err(PublishError::Unavailable {
                topic: topic.to_string(),
                message: "event bus switched off".into(),
            });
        }

        let mut published = self.published.write();
        if published.len() == self.retained {
            published.pop_front();
        }
        published.push_back((topic.to_string(), event.clone()));
        Ok(())
    }
}
