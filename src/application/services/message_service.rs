//! Message Service
//!
//! Creates, lists and searches the messages of a chat. Every operation first
//! resolves the chat from the application and the chat number in the path.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument};

use super::errors::CreationFailure;
use crate::application::fanout::{FanoutHandle, SideEffect};
use crate::domain::{
    Chat, ChatNumber, ChatRepository, DomainEvent, InvalidChatNumber, Message, MessageQuery,
    MessageRepository, NewMessage, ScopeKey, SearchError, SearchIndex, SequenceAllocator,
    StoreError,
};

/// Message service trait
#[async_trait]
pub trait MessageService: Send + Sync {
    /// Allocate the next message number of the chat and persist the message.
    async fn create_message(
        &self,
        application_id: &str,
        chat_number: &str,
        body: &str,
    ) -> Result<Message, MessageError>;

    /// All messages of the chat, ascending by number.
    async fn list_messages(
        &self,
        application_id: &str,
        chat_number: &str,
    ) -> Result<Vec<Message>, MessageError>;

    /// Messages of the chat whose body matches `query`, most recent first.
    async fn search_messages(
        &self,
        application_id: &str,
        chat_number: &str,
        query: &str,
    ) -> Result<Vec<Message>, MessageError>;
}

/// Message service errors
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error(transparent)]
    InvalidChatNumber(#[from] InvalidChatNumber),

    #[error("chat {number} not found for application {application_id}")]
    ChatNotFound { application_id: String, number: i64 },

    #[error("search query is required")]
    EmptyQuery,

    #[error("message creation failed: {0}")]
    CreationFailed(#[source] CreationFailure),

    #[error("message lookup failed: {0}")]
    LookupFailed(#[source] StoreError),

    #[error("message search failed: {0}")]
    SearchFailed(#[source] SearchError),
}

impl MessageError {
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidChatNumber(_) | Self::ChatNotFound { .. } | Self::EmptyQuery
        )
    }
}

/// Where message documents live and how many hits a search returns.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub collection: String,
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            collection: "messages".to_string(),
            max_results: 10,
        }
    }
}

/// MessageService implementation
pub struct MessageServiceImpl<C, M, A, S>
where
    C: ChatRepository + ?Sized,
    M: MessageRepository + ?Sized,
    A: SequenceAllocator + ?Sized,
    S: SearchIndex + ?Sized,
{
    chat_repo: Arc<C>,
    message_repo: Arc<M>,
    allocator: Arc<A>,
    search_index: Arc<S>,
    fanout: FanoutHandle,
    search: SearchOptions,
}

impl<C, M, A, S> MessageServiceImpl<C, M, A, S>
where
    C: ChatRepository + ?Sized,
    M: MessageRepository + ?Sized,
    A: SequenceAllocator + ?Sized,
    S: SearchIndex + ?Sized,
{
    pub fn new(
        chat_repo: Arc<C>,
        message_repo: Arc<M>,
        allocator: Arc<A>,
        search_index: Arc<S>,
        fanout: FanoutHandle,
        search: SearchOptions,
    ) -> Self {
        Self {
            chat_repo,
            message_repo,
            allocator,
            search_index,
            fanout,
            search,
        }
    }

    /// Parse the chat number and find the chat it names.
    async fn resolve_chat(
        &self,
        application_id: &str,
        chat_number: &str,
    ) -> Result<Chat, MessageError> {
        let number = ChatNumber::parse(chat_number)?.value();
        let not_found = || MessageError::ChatNotFound {
            application_id: application_id.to_string(),
            number,
        };

        // Numbers start at 1.
        if number < 1 {
            return Err(not_found());
        }

        self.chat_repo
            .find_by_application_and_number(application_id, number)
            .await
            .map_err(MessageError::LookupFailed)?
            .ok_or_else(not_found)
    }
}

#[async_trait]
impl<C, M, A, S> MessageService for MessageServiceImpl<C, M, A, S>
where
    C: ChatRepository + ?Sized,
    M: MessageRepository + ?Sized,
    A: SequenceAllocator + ?Sized,
    S: SearchIndex + ?Sized,
{
    #[instrument(skip(self, body))]
    async fn create_message(
        &self,
        application_id: &str,
        chat_number: &str,
        body: &str,
    ) -> Result<Message, MessageError> {
        let chat = self.resolve_chat(application_id, chat_number).await?;

        let number = self
            .allocator
            .next(&ScopeKey::messages(chat.id))
            .await
            .map_err(|e| MessageError::CreationFailed(CreationFailure::AllocationUnavailable(e)))?;

        let message = self
            .message_repo
            .insert(NewMessage::new(chat.id, number, body))
            .await
            .map_err(|e| {
                error!(chat_id = chat.id, number, error = %e, "Message number burned by failed write");
                MessageError::CreationFailed(CreationFailure::WriteFailure(e))
            })?;

        info!(chat_id = chat.id, message_id = message.id, number, "Message created");
        self.fanout.submit(SideEffect::IndexMessage(message.clone()));
        self.fanout
            .submit(SideEffect::Publish(DomainEvent::MessageCreated(message.clone())));

        Ok(message)
    }

    #[instrument(skip(self))]
    async fn list_messages(
        &self,
        application_id: &str,
        chat_number: &str,
    ) -> Result<Vec<Message>, MessageError> {
        let chat = self.resolve_chat(application_id, chat_number).await?;

        self.message_repo
            .list_by_chat(chat.id)
            .await
            .map_err(MessageError::LookupFailed)
    }

    #[instrument(skip(self))]
    async fn search_messages(
        &self,
        application_id: &str,
        chat_number: &str,
        query: &str,
    ) -> Result<Vec<Message>, MessageError> {
        ChatNumber::parse(chat_number)?;
        let text = query.trim();
        if text.is_empty() {
            return Err(MessageError::EmptyQuery);
        }

        let chat = self.resolve_chat(application_id, chat_number).await?;
        let query = MessageQuery::new(text, chat.id, self.search.max_results);

        self.search_index
            .search(&self.search.collection, &query)
            .await
            .map_err(|e| {
                error!(chat_id = chat.id, error = %e, "Message search failed");
                MessageError::SearchFailed(e)
            })
    }
}
