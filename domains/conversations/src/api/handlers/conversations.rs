//! Conversation API handlers
//!
//! Every handler checks the token ability before touching the domain; the
//! services then apply membership and creator rules.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use threadline_auth::{abilities, AuthUser};
use threadline_common::ValidatedJson;
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::ConversationsState;
use crate::domain::entities::{ConversationDetails, ConversationPatch, NewConversation, RosterEntry};
use crate::domain::error::ChatError;

type Result<T> = std::result::Result<T, ChatError>;

/// Request for creating a conversation
#[derive(Debug, Deserialize, Validate)]
pub struct CreateConversationRequest {
    #[validate(length(max = 255, message = "The name may not be greater than 255 characters."))]
    pub name: Option<String>,

    #[validate(length(
        max = 2000,
        message = "The description may not be greater than 2000 characters."
    ))]
    pub description: Option<String>,

    /// Users to add besides the creator
    #[serde(default)]
    #[validate(length(max = 100, message = "At most 100 participants may be added at once."))]
    pub participant_ids: Vec<Uuid>,
}

/// Request for updating a conversation; absent fields are left untouched
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateConversationRequest {
    #[validate(length(max = 255, message = "The name may not be greater than 255 characters."))]
    pub name: Option<String>,

    #[validate(length(
        max = 2000,
        message = "The description may not be greater than 2000 characters."
    ))]
    pub description: Option<String>,
}

/// Roster member as rendered inside a conversation
#[derive(Debug, Serialize)]
pub struct ParticipantResponse {
    pub id: Uuid,
    pub name: String,
    pub joined_at: DateTime<Utc>,
}

impl From<RosterEntry> for ParticipantResponse {
    fn from(entry: RosterEntry) -> Self {
        Self {
            id: entry.user_id,
            name: entry.name,
            joined_at: entry.joined_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub participants: Vec<ParticipantResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ConversationDetails> for ConversationResponse {
    fn from(details: ConversationDetails) -> Self {
        let conv = details.conversation;
        Self {
            id: conv.id,
            name: conv.name,
            description: conv.description,
            created_by: conv.created_by,
            participants: details.participants.into_iter().map(Into::into).collect(),
            created_at: conv.created_at,
            updated_at: conv.updated_at,
        }
    }
}

/// Envelope for non-paginated lists
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
}

/// GET /conversations: Conversations the caller participates in
pub async fn list_conversations(
    AuthUser(auth_context): AuthUser,
    State(state): State<ConversationsState>,
) -> Result<Json<ListResponse<ConversationResponse>>> {
    auth_context.ensure_ability(abilities::CONVERSATIONS_READ)?;

    let conversations = state.conversations().list(auth_context.user_id()).await?;

    Ok(Json(ListResponse {
        data: conversations.into_iter().map(Into::into).collect(),
    }))
}

/// POST /conversations: Create a conversation with the caller as creator
pub async fn create_conversation(
    AuthUser(auth_context): AuthUser,
    State(state): State<ConversationsState>,
    ValidatedJson(request): ValidatedJson<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ConversationResponse>)> {
    auth_context.ensure_ability(abilities::CONVERSATIONS_WRITE)?;

    let details = state
        .conversations()
        .create(
            auth_context.user_id(),
            NewConversation {
                name: request.name,
                description: request.description,
                participant_ids: request.participant_ids,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(details.into())))
}

/// GET /conversations/{id}: One conversation with its roster
pub async fn get_conversation(
    AuthUser(auth_context): AuthUser,
    State(state): State<ConversationsState>,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<ConversationResponse>> {
    auth_context.ensure_ability(abilities::CONVERSATIONS_READ)?;

    let details = state
        .conversations()
        .show(conversation_id, auth_context.user_id())
        .await?;

    Ok(Json(details.into()))
}

/// PUT /conversations/{id}: Rename or re-describe (creator only)
pub async fn update_conversation(
    AuthUser(auth_context): AuthUser,
    State(state): State<ConversationsState>,
    Path(conversation_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateConversationRequest>,
) -> Result<Json<ConversationResponse>> {
    auth_context.ensure_ability(abilities::CONVERSATIONS_WRITE)?;

    let details = state
        .conversations()
        .update(
            conversation_id,
            auth_context.user_id(),
            ConversationPatch {
                name: request.name,
                description: request.description,
            },
        )
        .await?;

    Ok(Json(details.into()))
}

/// DELETE /conversations/{id}: Delete with roster and messages (creator only)
pub async fn delete_conversation(
    AuthUser(auth_context): AuthUser,
    State(state): State<ConversationsState>,
    Path(conversation_id): Path<Uuid>,
) -> Result<StatusCode> {
    auth_context.ensure_ability(abilities::CONVERSATIONS_WRITE)?;

    state
        .conversations()
        .delete(conversation_id, auth_context.user_id())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
