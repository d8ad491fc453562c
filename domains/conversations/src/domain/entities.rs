//! Domain entities for the conversations domain
//!
//! Conversations own a participant roster and a flat table of messages.
//! A message may point at another message of the same conversation through
//! `reply_to_id`; the reference is an id resolved by lookup, never an
//! embedded value, so reply previews are always exactly one level deep.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::error::ChatError;
use super::state::{MessageEvent, MessageState, MessageStateMachine};

/// Maximum conversation name length
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum conversation description length
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Maximum number of participant ids accepted on creation
pub const MAX_PARTICIPANT_IDS: usize = 100;

/// Maximum message content length
pub const MAX_CONTENT_LENGTH: usize = 10_000;

/// Conversation entity
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation
    pub fn new(
        created_by: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<Self, ChatError> {
        Self::validate_name(name.as_deref())?;
        Self::validate_description(description.as_deref())?;

        let now = Utc::now();
        Ok(Conversation {
            id: Uuid::new_v4(),
            name,
            description,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_creator(&self, user_id: Uuid) -> bool {
        self.created_by == user_id
    }

    /// Merge the provided fields; absent fields are left untouched
    pub fn apply_patch(&mut self, patch: ConversationPatch) -> Result<(), ChatError> {
        if let Some(name) = patch.name {
            Self::validate_name(Some(&name))?;
            self.name = Some(name);
        }
        if let Some(description) = patch.description {
            Self::validate_description(Some(&description))?;
            self.description = Some(description);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    fn validate_name(name: Option<&str>) -> Result<(), ChatError> {
        match name {
            Some(n) if n.chars().count() > MAX_NAME_LENGTH => Err(ChatError::field(
                "name",
                "The name may not be greater than 255 characters.",
            )),
            _ => Ok(()),
        }
    }

    fn validate_description(description: Option<&str>) -> Result<(), ChatError> {
        match description {
            Some(d) if d.chars().count() > MAX_DESCRIPTION_LENGTH => Err(ChatError::field(
                "description",
                "The description may not be greater than 2000 characters.",
            )),
            _ => Ok(()),
        }
    }
}

/// Input for conversation creation
#[derive(Debug, Clone, Default)]
pub struct NewConversation {
    pub name: Option<String>,
    pub description: Option<String>,
    pub participant_ids: Vec<Uuid>,
}

impl NewConversation {
    /// Participant ids other than the creator, de-duplicated, in request order
    pub fn additional_participants(&self, creator_id: Uuid) -> Vec<Uuid> {
        let mut seen = std::collections::HashSet::new();
        self.participant_ids
            .iter()
            .copied()
            .filter(|id| *id != creator_id && seen.insert(*id))
            .collect()
    }
}

/// Partial update of a conversation
#[derive(Debug, Clone, Default)]
pub struct ConversationPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Roster row: pairs a conversation with a user
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Participant {
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(conversation_id: Uuid, user_id: Uuid) -> Self {
        Self {
            conversation_id,
            user_id,
            joined_at: Utc::now(),
        }
    }
}

/// Public identity of a user inside a conversation
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
}

/// A roster row joined with the participant's user summary
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RosterEntry {
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub joined_at: DateTime<Utc>,
}

/// Conversation plus its participant roster
#[derive(Debug, Clone)]
pub struct ConversationDetails {
    pub conversation: Conversation,
    pub participants: Vec<RosterEntry>,
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub reply_to_id: Option<Uuid>,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message. Content is stored trimmed.
    pub fn new(
        conversation_id: Uuid,
        user_id: Uuid,
        content: &str,
        reply_to_id: Option<Uuid>,
    ) -> Result<Self, ChatError> {
        let content = Self::validate_content(content)?;

        let now = Utc::now();
        Ok(Message {
            id: Uuid::new_v4(),
            conversation_id,
            user_id,
            content,
            reply_to_id,
            edited_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validate content and return its trimmed form
    pub fn validate_content(content: &str) -> Result<String, ChatError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(ChatError::field("content", "The content field is required."));
        }
        if trimmed.chars().count() > MAX_CONTENT_LENGTH {
            return Err(ChatError::field(
                "content",
                "The content may not be greater than 10000 characters.",
            ));
        }
        Ok(trimmed.to_string())
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Current lifecycle state (a stored row is never `Deleted`)
    pub fn state(&self) -> MessageState {
        if self.edited_at.is_some() {
            MessageState::Edited
        } else {
            MessageState::Created
        }
    }

    /// Replace the content and mark the message edited
    pub fn edit(&mut self, content: &str) -> Result<(), ChatError> {
        let content = Self::validate_content(content)?;
        MessageStateMachine::transition(self.state(), MessageEvent::Edit)?;

        let now = Utc::now();
        self.content = content;
        self.edited_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

/// Shallow preview of the message being replied to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplySummary {
    pub id: Uuid,
    pub content: String,
    pub author: UserSummary,
}

/// A message with its author and (at most one level of) reply preview
#[derive(Debug, Clone, PartialEq)]
pub struct MessageView {
    pub message: Message,
    pub author: UserSummary,
    pub reply_to: Option<ReplySummary>,
}
