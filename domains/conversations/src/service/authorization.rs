//! Membership and creator checks gating every conversation and message path
//!
//! Checks are read-then-act: nothing is locked between the check and the
//! caller's subsequent write, and nothing is cached.

use uuid::Uuid;

use crate::domain::entities::Conversation;
use crate::domain::error::ChatError;
use crate::repository::ConversationsRepositories;

#[derive(Clone)]
pub struct AuthorizationService {
    repos: ConversationsRepositories,
}

impl AuthorizationService {
    pub fn new(repos: ConversationsRepositories) -> Self {
        Self { repos }
    }

    /// True iff a roster row exists for the pair. A missing conversation
    /// simply has no rows.
    pub async fn is_participant(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, ChatError> {
        Ok(self
            .repos
            .participants
            .exists(conversation_id, user_id)
            .await?)
    }

    /// True iff the conversation exists and was created by the user
    pub async fn is_creator(&self, conversation_id: Uuid, user_id: Uuid) -> Result<bool, ChatError> {
        let conv = self.repos.conversations.find(conversation_id).await?;
        Ok(conv.is_some_and(|c| c.is_creator(user_id)))
    }

    pub async fn ensure_participant(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), ChatError> {
        if self.is_participant(conversation_id, user_id).await? {
            Ok(())
        } else {
            tracing::debug!(conversation_id = %conversation_id, user_id = %user_id, "Not a participant");
            Err(ChatError::NotAParticipant)
        }
    }

    pub async fn ensure_creator(&self, conversation_id: Uuid, user_id: Uuid) -> Result<(), ChatError> {
        if self.is_creator(conversation_id, user_id).await? {
            Ok(())
        } else {
            tracing::debug!(conversation_id = %conversation_id, user_id = %user_id, "Not the creator");
            Err(ChatError::NotCreator)
        }
    }

    /// Load a conversation the user participates in.
    ///
    /// Existence is checked before membership, so a missing conversation is
    /// `ConversationNotFound` while a foreign one is `NotAParticipant`.
    pub async fn get_conversation_for_user(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<Conversation, ChatError> {
        let conv = self
            .repos
            .conversations
            .find(conversation_id)
            .await?
            .ok_or(ChatError::ConversationNotFound)?;

        self.ensure_participant(conversation_id, user_id).await?;
        Ok(conv)
    }
}
