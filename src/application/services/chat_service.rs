//! Chat Service
//!
//! Creates chats under an application and lists them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument};

use super::errors::CreationFailure;
use crate::application::fanout::{FanoutHandle, SideEffect};
use crate::domain::{
    Chat, ChatRepository, DomainEvent, NewChat, ScopeKey, SequenceAllocator, StoreError,
};

/// Chat service trait
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Allocate the next chat number of the application and persist the chat.
    async fn create_chat(&self, application_id: &str) -> Result<Chat, ChatError>;

    /// All chats of the application, ascending by number.
    async fn list_chats(&self, application_id: &str) -> Result<Vec<Chat>, ChatError>;
}

/// Chat service errors
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat creation failed: {0}")]
    CreationFailed(#[source] CreationFailure),

    #[error("chat lookup failed: {0}")]
    LookupFailed(#[source] StoreError),
}

impl ChatError {
    /// Chat operations take no client input that can be invalid.
    pub fn is_client_error(&self) -> bool {
        false
    }
}

/// ChatService implementation
pub struct ChatServiceImpl<C, A>
where
    C: ChatRepository + ?Sized,
    A: SequenceAllocator + ?Sized,
{
    chat_repo: Arc<C>,
    allocator: Arc<A>,
    fanout: FanoutHandle,
}

impl<C, A> ChatServiceImpl<C, A>
where
    C: ChatRepository + ?Sized,
    A: SequenceAllocator + ?Sized,
{
    pub fn new(chat_repo: Arc<C>, allocator: Arc<A>, fanout: FanoutHandle) -> Self {
        Self {
            chat_repo,
            allocator,
            fanout,
        }
    }
}

#[async_trait]
impl<C, A> ChatService for ChatServiceImpl<C, A>
where
    C: ChatRepository + ?Sized,
    A: SequenceAllocator + ?Sized,
{
    #[instrument(skip(self))]
    async fn create_chat(&self, application_id: &str) -> Result<Chat, ChatError> {
        let number = self
            .allocator
            .next(&ScopeKey::chats(application_id))
            .await
            .map_err(|e| ChatError::CreationFailed(CreationFailure::AllocationUnavailable(e)))?;

        let chat = self
            .chat_repo
            .insert(NewChat::new(application_id, number))
            .await
            .map_err(|e| {
                error!(number, error = %e, "Chat number burned by failed write");
                ChatError::CreationFailed(CreationFailure::WriteFailure(e))
            })?;

        info!(chat_id = chat.id, number = chat.number, "Chat created");
        self.fanout
            .submit(SideEffect::Publish(DomainEvent::ChatCreated(chat.clone())));

        Ok(chat)
    }

    #[instrument(skip(self))]
    async fn list_chats(&self, application_id: &str) -> Result<Vec<Chat>, ChatError> {
        self.chat_repo
            .list_by_application(application_id)
            .await
            .map_err(ChatError::LookupFailed)
    }
}
