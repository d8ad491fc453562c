//! Conversations domain errors
//!
//! The service layer raises these; only `IntoResponse` knows about HTTP.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use threadline_auth::AuthError;
use threadline_common::{Error, FieldErrors, StateError};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("You are not a participant in this conversation")]
    NotAParticipant,

    #[error("Only the conversation creator can perform this action")]
    NotCreator,

    #[error("You can only modify your own messages")]
    NotMessageOwner,

    #[error("Conversation not found")]
    ConversationNotFound,

    #[error("Message not found")]
    MessageNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Participant not found")]
    ParticipantNotFound,

    #[error("The message being replied to does not exist")]
    ReplyTargetNotFound,

    #[error("User is already a participant in this conversation")]
    AlreadyParticipant,

    #[error("Unknown participant ids: {}", join_ids(.0))]
    InvalidParticipant(Vec<Uuid>),

    #[error("Cannot reply to a message from another conversation")]
    ReplyTargetCrossConversation,

    #[error("{0}")]
    Validation(FieldErrors),

    #[error("Invalid message state: {0}")]
    State(#[from] StateError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Common(#[from] Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn join_ids(ids: &[Uuid]) -> String {
    ids.iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ChatError {
    /// Single field validation failure
    pub fn field(field: &str, message: &str) -> Self {
        let mut fields = FieldErrors::new();
        fields.add(field, message);
        ChatError::Validation(fields)
    }

    /// Status and code for the variants this domain owns.
    /// Delegated variants (auth, common, database, state) return `None`.
    fn classify(&self) -> Option<(StatusCode, &'static str)> {
        let classified = match self {
            ChatError::NotAParticipant => (StatusCode::FORBIDDEN, "NOT_A_PARTICIPANT"),
            ChatError::NotCreator => (StatusCode::FORBIDDEN, "NOT_CREATOR"),
            ChatError::NotMessageOwner => (StatusCode::FORBIDDEN, "NOT_MESSAGE_OWNER"),
            ChatError::ConversationNotFound => (StatusCode::NOT_FOUND, "CONVERSATION_NOT_FOUND"),
            ChatError::MessageNotFound => (StatusCode::NOT_FOUND, "MESSAGE_NOT_FOUND"),
            ChatError::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            ChatError::ParticipantNotFound => (StatusCode::NOT_FOUND, "PARTICIPANT_NOT_FOUND"),
            ChatError::ReplyTargetNotFound => (StatusCode::NOT_FOUND, "REPLY_TARGET_NOT_FOUND"),
            ChatError::AlreadyParticipant => (StatusCode::BAD_REQUEST, "ALREADY_PARTICIPANT"),
            ChatError::InvalidParticipant(_) => (StatusCode::BAD_REQUEST, "INVALID_PARTICIPANT"),
            ChatError::ReplyTargetCrossConversation => {
                (StatusCode::BAD_REQUEST, "REPLY_TARGET_CROSS_CONVERSATION")
            }
            ChatError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            ChatError::State(_)
            | ChatError::Auth(_)
            | ChatError::Common(_)
            | ChatError::Database(_) => return None,
        };
        Some(classified)
    }

    /// HTTP status this error renders with
    pub fn status_code(&self) -> StatusCode {
        match self {
            ChatError::Auth(e) => e.status_code(),
            ChatError::Common(e) => e.status_code(),
            _ => self
                .classify()
                .map(|(status, _)| status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let Some((status, code)) = self.classify() else {
            return match self {
                ChatError::Auth(e) => e.into_response(),
                ChatError::Common(e) => e.into_response(),
                ChatError::Database(e) => Error::Database(e).into_response(),
                other => Error::Internal(other.to_string()).into_response(),
            };
        };

        let message = self.to_string();
        let body = match self {
            ChatError::Validation(fields) => json!({
                "error": { "code": code, "message": message, "fields": fields }
            }),
            ChatError::InvalidParticipant(ids) => json!({
                "error": { "code": code, "message": message, "invalid_ids": ids }
            }),
            _ => json!({
                "error": { "code": code, "message": message }
            }),
        };

        (status, Json(body)).into_response()
    }
}
