use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::FailureSwitch;
use crate::domain::{
    Chat, ChatRepository, Message, MessageRepository, NewChat, NewMessage, StoreError,
};

/// Chats in insertion order with the same uniqueness rule as the schema.
#[derive(Debug)]
pub struct InMemoryChatRepository {
    chats: RwLock<Vec<Chat>>,
    next_id: AtomicI64,
    failing_writes: FailureSwitch,
    failing_reads: FailureSwitch,
}

impl Default for InMemoryChatRepository {
    fn default() -> Self {
        Self {
            chats: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
            failing_writes: FailureSwitch::default(),
            failing_reads: FailureSwitch::default(),
        }
    }
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_writes_failing(&self, failing: bool) {
        self.failing_writes.set(failing);
    }

    pub fn set_reads_failing(&self, failing: bool) {
        self.failing_reads.set(failing);
    }

    pub fn len(&self) -> usize {
        self.chats.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.read().is_empty()
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn insert(&self, chat: NewChat) -> Result<Chat, StoreError> {
        if self.failing_writes.is_on() {
            return Err(StoreError::write("chat", "entity store switched off"));
        }

        let mut chats = self.chats.write();
        if chats
            .iter()
            .any(|c| c.application_id == chat.application_id && c.number == chat.number)
        {
            return Err(StoreError::write(
                "chat",
                format!(
                    "duplicate number {} for application {}",
                    chat.number, chat.application_id
                ),
            ));
        }

        let chat = chat.into_chat(self.next_id.fetch_add(1, Ordering::SeqCst));
        chats.push(chat.clone());
        Ok(chat)
    }

    async fn find_by_application_and_number(
        &self,
        application_id: &str,
        number: i64,
    ) -> Result<Option<Chat>, StoreError> {
        if self.failing_reads.is_on() {
            return Err(StoreError::lookup("find_chat", "entity store switched off"));
        }

        Ok(self
            .chats
            .read()
            .iter()
            .find(|c| c.application_id == application_id && c.number == number)
            .cloned())
    }

    async fn list_by_application(&self, application_id: &str) -> Result<Vec<Chat>, StoreError> {
        if self.failing_reads.is_on() {
            return Err(StoreError::lookup("list_chats", "entity store switched off"));
        }

        let mut chats: Vec<Chat> = self
            .chats
            .read()
            .iter()
            .filter(|c| c.application_id == application_id)
            .cloned()
            .collect();
        chats.sort_by_key(|c| c.number);
        Ok(chats)
    }
}

/// Messages in insertion order with the same uniqueness rule as the schema.
#[derive(Debug)]
pub struct InMemoryMessageRepository {
    messages: RwLock<Vec<Message>>,
    next_id: AtomicI64,
    failing_writes: FailureSwitch,
    failing_reads: FailureSwitch,
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
            failing_writes: FailureSwitch::default(),
            failing_reads: FailureSwitch::default(),
        }
    }
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_writes_failing(&self, failing: bool) {
        self.failing_writes.set(failing);
    }

    pub fn set_reads_failing(&self, failing: bool) {
        self.failing_reads.set(failing);
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: NewMessage) -> Result<Message, StoreError> {
        if self.failing_writes.is_on() {
            return Err(StoreError::write("message", "entity store switched off"));
        }

        let mut messages = self.messages.write();
        if messages
            .iter()
            .any(|m| m.chat_id == message.chat_id && m.number == message.number)
        {
            return Err(StoreError::write(
                "message",
                format!(
                    "duplicate number {} for chat {}",
                    message.number, message.chat_id
                ),
            ));
        }

        let message = message.into_message(self.next_id.fetch_add(1, Ordering::SeqCst));
        messages.push(message.clone());
        Ok(message)
    }

    async fn list_by_chat(&self, chat_id: i64) -> Result<Vec<Message>, StoreError> {
        if self.failing_reads.is_on() {
            return Err(StoreError::lookup("list_messages", "entity store switched off"));
        }

        let mut messages: Vec<Message> = self
            .messages
            .read()
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.number);
        Ok(messages)
    }
}
