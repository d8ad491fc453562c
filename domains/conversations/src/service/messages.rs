//! Message posting, reading, editing and deletion inside conversations

use threadline_common::{Page, Pagination, RepositoryError};
use uuid::Uuid;

use super::authorization::AuthorizationService;
use crate::domain::entities::{Message, MessageView};
use crate::domain::error::ChatError;
use crate::domain::state::{MessageEvent, MessageStateMachine};
use crate::repository::ConversationsRepositories;

#[derive(Clone)]
pub struct MessageService {
    repos: ConversationsRepositories,
    authz: AuthorizationService,
}

impl MessageService {
    pub fn new(repos: ConversationsRepositories) -> Self {
        Self {
            authz: AuthorizationService::new(repos.clone()),
            repos,
        }
    }

    /// Newest-first page of a conversation's messages
    pub async fn list(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<MessageView>, ChatError> {
        self.authz
            .ensure_participant(conversation_id, user_id)
            .await?;

        let (views, total) = self
            .repos
            .messages
            .list_page(conversation_id, pagination)
            .await?;

        Ok(Page::new(views, pagination, total))
    }

    /// Post a message, optionally replying to another message of the same
    /// conversation
    pub async fn create(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
        content: &str,
        reply_to_id: Option<Uuid>,
    ) -> Result<MessageView, ChatError> {
        self.authz
            .ensure_participant(conversation_id, user_id)
            .await?;

        if let Some(target_id) = reply_to_id {
            let target = self
                .repos
                .messages
                .find(target_id)
                .await?
                .ok_or(ChatError::ReplyTargetNotFound)?;

            if target.conversation_id != conversation_id {
                return Err(ChatError::ReplyTargetCrossConversation);
            }
        }

        let message = Message::new(conversation_id, user_id, content, reply_to_id)?;
        self.repos
            .messages
            .create(&message)
            .await
            .map_err(|e| insert_error(e, reply_to_id))?;

        tracing::info!(
            message_id = %message.id,
            conversation_id = %conversation_id,
            user_id = %user_id,
            is_reply = reply_to_id.is_some(),
            "Message posted"
        );

        self.view(message.id).await
    }

    /// A single message; the caller must participate in its conversation
    pub async fn get(&self, message_id: Uuid, user_id: Uuid) -> Result<MessageView, ChatError> {
        let view = self
            .repos
            .messages
            .find_view(message_id)
            .await?
            .ok_or(ChatError::MessageNotFound)?;

        self.authz
            .ensure_participant(view.message.conversation_id, user_id)
            .await?;

        Ok(view)
    }

    /// Replace the content of the caller's own message
    pub async fn update(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<MessageView, ChatError> {
        let mut message = self.owned_message(message_id, user_id).await?;

        message.edit(content)?;
        if !self.repos.messages.update_content(&message).await? {
            return Err(ChatError::MessageNotFound);
        }

        tracing::info!(message_id = %message_id, user_id = %user_id, "Message edited");
        self.view(message_id).await
    }

    /// Delete the caller's own message. Replies to it survive with their
    /// reference cleared.
    pub async fn delete(&self, message_id: Uuid, user_id: Uuid) -> Result<(), ChatError> {
        let message = self.owned_message(message_id, user_id).await?;

        MessageStateMachine::transition(message.state(), MessageEvent::Delete)?;
        if !self.repos.messages.delete(message_id).await? {
            return Err(ChatError::MessageNotFound);
        }

        tracing::info!(message_id = %message_id, user_id = %user_id, "Message deleted");
        Ok(())
    }

    /// Load a message for mutation: authorship is checked before membership
    async fn owned_message(&self, message_id: Uuid, user_id: Uuid) -> Result<Message, ChatError> {
        let message = self
            .repos
            .messages
            .find(message_id)
            .await?
            .ok_or(ChatError::MessageNotFound)?;

        if !message.is_authored_by(user_id) {
            tracing::debug!(
                message_id = %message_id,
                user_id = %user_id,
                "Message mutation denied: not the author"
            );
            return Err(ChatError::NotMessageOwner);
        }

        self.authz
            .ensure_participant(message.conversation_id, user_id)
            .await?;

        Ok(message)
    }

    async fn view(&self, message_id: Uuid) -> Result<MessageView, ChatError> {
        self.repos
            .messages
            .find_view(message_id)
            .await?
            .ok_or(ChatError::MessageNotFound)
    }
}

/// An insert only misses a row when the reply target or the conversation
/// was deleted after it was checked
fn insert_error(err: RepositoryError, reply_to_id: Option<Uuid>) -> ChatError {
    match err {
        RepositoryError::NotFound if reply_to_id.is_some() => ChatError::ReplyTargetNotFound,
        RepositoryError::NotFound => ChatError::ConversationNotFound,
        RepositoryError::Connection(e) => ChatError::Database(e),
        other => ChatError::Common(other.into()),
    }
}
