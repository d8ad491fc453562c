//! Participant roster API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use threadline_auth::{abilities, AuthUser};
use threadline_common::ValidatedJson;
use uuid::Uuid;
use validator::Validate;

use super::conversations::{ListResponse, ParticipantResponse};
use crate::api::middleware::ConversationsState;
use crate::domain::error::ChatError;

type Result<T> = std::result::Result<T, ChatError>;

#[derive(Debug, Deserialize, Validate)]
pub struct AddParticipantRequest {
    pub user_id: Uuid,
}

/// POST /conversations/{id}/participants: Add a user to the roster
pub async fn add_participant(
    AuthUser(auth_context): AuthUser,
    State(state): State<ConversationsState>,
    Path(conversation_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<AddParticipantRequest>,
) -> Result<Json<ParticipantResponse>> {
    auth_context.ensure_ability(abilities::PARTICIPANTS_WRITE)?;

    let entry = state
        .conversations()
        .add_participant(conversation_id, auth_context.user_id(), request.user_id)
        .await?;

    Ok(Json(entry.into()))
}

/// DELETE /conversations/{id}/participants/{user_id}: Remove a user; returns
/// the remaining roster
pub async fn remove_participant(
    AuthUser(auth_context): AuthUser,
    State(state): State<ConversationsState>,
    Path((conversation_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ListResponse<ParticipantResponse>>> {
    auth_context.ensure_ability(abilities::PARTICIPANTS_WRITE)?;

    let roster = state
        .conversations()
        .remove_participant(conversation_id, auth_context.user_id(), user_id)
        .await?;

    Ok(Json(ListResponse {
        data: roster.into_iter().map(Into::into).collect(),
    }))
}
