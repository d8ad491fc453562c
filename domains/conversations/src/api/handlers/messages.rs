//! Message API handlers
//!
//! Implements:
//! - GET    /conversations/{id}/messages: Paginated, newest first
//! - POST   /conversations/{id}/messages: Post (optionally as a reply)
//! - GET    /messages/{id}: Show one message
//! - PUT    /messages/{id}: Edit own message
//! - DELETE /messages/{id}: Delete own message

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use threadline_auth::{abilities, AuthUser};
use threadline_common::{Page, Pagination, ValidatedJson};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::middleware::ConversationsState;
use crate::domain::entities::{MessageView, ReplySummary, UserSummary};
use crate::domain::error::ChatError;

type Result<T> = std::result::Result<T, ChatError>;

/// Content must contain something other than whitespace
fn validate_not_blank(content: &str) -> std::result::Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[validate(
        length(max = 10000, message = "The content may not be greater than 10000 characters."),
        custom(function = "validate_not_blank", message = "The content field is required.")
    )]
    pub content: String,

    pub reply_to_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMessageRequest {
    #[validate(
        length(max = 10000, message = "The content may not be greater than 10000 characters."),
        custom(function = "validate_not_blank", message = "The content field is required.")
    )]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub content: String,
    pub reply_to_id: Option<Uuid>,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: UserSummary,
    pub reply_to: Option<ReplySummary>,
}

impl From<MessageView> for MessageResponse {
    fn from(view: MessageView) -> Self {
        let msg = view.message;
        Self {
            id: msg.id,
            conversation_id: msg.conversation_id,
            content: msg.content,
            reply_to_id: msg.reply_to_id,
            edited_at: msg.edited_at,
            created_at: msg.created_at,
            updated_at: msg.updated_at,
            author: view.author,
            reply_to: view.reply_to,
        }
    }
}

/// GET /conversations/{id}/messages
pub async fn list_messages(
    AuthUser(auth_context): AuthUser,
    State(state): State<ConversationsState>,
    Path(conversation_id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Page<MessageResponse>>> {
    auth_context.ensure_ability(abilities::MESSAGES_READ)?;

    let page = state
        .messages()
        .list(conversation_id, auth_context.user_id(), pagination)
        .await?;

    Ok(Json(page.map(Into::into)))
}

/// POST /conversations/{id}/messages
pub async fn create_message(
    AuthUser(auth_context): AuthUser,
    State(state): State<ConversationsState>,
    Path(conversation_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    auth_context.ensure_ability(abilities::MESSAGES_WRITE)?;

    let view = state
        .messages()
        .create(
            conversation_id,
            auth_context.user_id(),
            &request.content,
            request.reply_to_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(view.into())))
}

/// GET /messages/{id}
pub async fn get_message(
    AuthUser(auth_context): AuthUser,
    State(state): State<ConversationsState>,
    Path(message_id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    auth_context.ensure_ability(abilities::MESSAGES_READ)?;

    let view = state
        .messages()
        .get(message_id, auth_context.user_id())
        .await?;

    Ok(Json(view.into()))
}

/// PUT /messages/{id}
pub async fn update_message(
    AuthUser(auth_context): AuthUser,
    State(state): State<ConversationsState>,
    Path(message_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateMessageRequest>,
) -> Result<Json<MessageResponse>> {
    auth_context.ensure_ability(abilities::MESSAGES_WRITE)?;

    let view = state
        .messages()
        .update(message_id, auth_context.user_id(), &request.content)
        .await?;

    Ok(Json(view.into()))
}

/// DELETE /messages/{id}
pub async fn delete_message(
    AuthUser(auth_context): AuthUser,
    State(state): State<ConversationsState>,
    Path(message_id): Path<Uuid>,
) -> Result<StatusCode> {
    auth_context.ensure_ability(abilities::MESSAGES_WRITE)?;

    state
        .messages()
        .delete(message_id, auth_context.user_id())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
