//! Conversation aggregate: the conversation row plus its participant roster

use std::collections::HashMap;

use threadline_common::RepositoryError;
use uuid::Uuid;

use super::authorization::AuthorizationService;
use crate::domain::entities::{
    Conversation, ConversationDetails, ConversationPatch, NewConversation, Participant,
    RosterEntry,
};
use crate::domain::error::ChatError;
use crate::repository::{
    add_participant_tx, create_conversation_tx, find_missing_users_tx, ConversationsRepositories,
};

#[derive(Clone)]
pub struct ConversationService {
    repos: ConversationsRepositories,
    authz: AuthorizationService,
}

impl ConversationService {
    pub fn new(repos: ConversationsRepositories) -> Self {
        Self {
            authz: AuthorizationService::new(repos.clone()),
            repos,
        }
    }

    /// Create a conversation with the creator and the requested participants.
    ///
    /// All rows are written in one transaction. Any id that does not resolve
    /// to a user aborts the whole creation with `InvalidParticipant`.
    pub async fn create(
        &self,
        creator_id: Uuid,
        input: NewConversation,
    ) -> Result<ConversationDetails, ChatError> {
        let others = input.additional_participants(creator_id);
        let conv = Conversation::new(creator_id, input.name, input.description)?;

        let mut tx = self.repos.begin().await?;

        create_conversation_tx(&mut tx, &conv).await?;
        add_participant_tx(&mut tx, &Participant::new(conv.id, creator_id))
            .await
            .map_err(repository_error)?;

        let missing = find_missing_users_tx(&mut tx, &others).await?;
        if !missing.is_empty() {
            tracing::debug!(
                creator_id = %creator_id,
                missing = missing.len(),
                "Conversation creation rejected: unknown participant ids"
            );
            return Err(ChatError::InvalidParticipant(missing));
        }

        for user_id in &others {
            add_participant_tx(&mut tx, &Participant::new(conv.id, *user_id))
                .await
                .map_err(repository_error)?;
        }

        tx.commit().await?;

        tracing::info!(
            conversation_id = %conv.id,
            creator_id = %creator_id,
            participants = others.len() + 1,
            "Conversation created"
        );

        self.with_roster(conv).await
    }

    /// Update name/description. Creator only.
    pub async fn update(
        &self,
        conversation_id: Uuid,
        caller_id: Uuid,
        patch: ConversationPatch,
    ) -> Result<ConversationDetails, ChatError> {
        self.authz.ensure_creator(conversation_id, caller_id).await?;

        let mut conv = self
            .repos
            .conversations
            .find(conversation_id)
            .await?
            .ok_or(ChatError::ConversationNotFound)?;

        conv.apply_patch(patch)?;
        if !self.repos.conversations.update(&conv).await? {
            return Err(ChatError::ConversationNotFound);
        }

        tracing::info!(conversation_id = %conversation_id, user_id = %caller_id, "Conversation updated");
        self.with_roster(conv).await
    }

    /// Delete a conversation with its roster and messages. Creator only.
    pub async fn delete(&self, conversation_id: Uuid, caller_id: Uuid) -> Result<(), ChatError> {
        self.authz.ensure_creator(conversation_id, caller_id).await?;

        if !self.repos.conversations.delete(conversation_id).await? {
            return Err(ChatError::ConversationNotFound);
        }

        tracing::info!(conversation_id = %conversation_id, user_id = %caller_id, "Conversation deleted");
        Ok(())
    }

    /// Add a user to the roster. Any participant may add others.
    pub async fn add_participant(
        &self,
        conversation_id: Uuid,
        caller_id: Uuid,
        target_user_id: Uuid,
    ) -> Result<RosterEntry, ChatError> {
        self.authz
            .ensure_participant(conversation_id, caller_id)
            .await?;

        if !self.repos.users.exists(target_user_id).await? {
            return Err(ChatError::UserNotFound);
        }

        if self
            .repos
            .participants
            .exists(conversation_id, target_user_id)
            .await?
        {
            return Err(ChatError::AlreadyParticipant);
        }

        // A concurrent add can still win between the check and the insert;
        // the primary key rejects ours and it surfaces the same way.
        self.repos
            .participants
            .create(&Participant::new(conversation_id, target_user_id))
            .await
            .map_err(repository_error)?;

        tracing::info!(
            conversation_id = %conversation_id,
            user_id = %caller_id,
            added_user_id = %target_user_id,
            "Participant added"
        );

        self.repos
            .participants
            .get(conversation_id, target_user_id)
            .await?
            .ok_or(ChatError::ParticipantNotFound)
    }

    /// Remove a user from the roster and return the remaining roster.
    /// Any participant may remove any participant, including the creator.
    pub async fn remove_participant(
        &self,
        conversation_id: Uuid,
        caller_id: Uuid,
        target_user_id: Uuid,
    ) -> Result<Vec<RosterEntry>, ChatError> {
        self.authz
            .ensure_participant(conversation_id, caller_id)
            .await?;

        if !self
            .repos
            .participants
            .delete(conversation_id, target_user_id)
            .await?
        {
            return Err(ChatError::ParticipantNotFound);
        }

        tracing::info!(
            conversation_id = %conversation_id,
            user_id = %caller_id,
            removed_user_id = %target_user_id,
            "Participant removed"
        );

        Ok(self.repos.participants.roster(conversation_id).await?)
    }

    /// Conversations the user participates in, newest first, with rosters
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<ConversationDetails>, ChatError> {
        let convs = self.repos.conversations.list_for_participant(user_id).await?;
        let ids: Vec<Uuid> = convs.iter().map(|c| c.id).collect();

        let mut rosters: HashMap<Uuid, Vec<RosterEntry>> = HashMap::new();
        for entry in self.repos.participants.rosters(&ids).await? {
            rosters.entry(entry.conversation_id).or_default().push(entry);
        }

        Ok(convs
            .into_iter()
            .map(|conversation| ConversationDetails {
                participants: rosters.remove(&conversation.id).unwrap_or_default(),
                conversation,
            })
            .collect())
    }

    /// One conversation with its roster; 404 before 403
    pub async fn show(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<ConversationDetails, ChatError> {
        let conv = self
            .authz
            .get_conversation_for_user(conversation_id, user_id)
            .await?;
        self.with_roster(conv).await
    }

    async fn with_roster(&self, conversation: Conversation) -> Result<ConversationDetails, ChatError> {
        let participants = self.repos.participants.roster(conversation.id).await?;
        Ok(ConversationDetails {
            conversation,
            participants,
        })
    }
}

/// Roster inserts only collide on the (conversation, user) primary key
fn repository_error(err: RepositoryError) -> ChatError {
    match err {
        RepositoryError::AlreadyExists => ChatError::AlreadyParticipant,
        RepositoryError::NotFound => ChatError::ParticipantNotFound,
        RepositoryError::Connection(e) => ChatError::Database(e),
    }
}
