//! Transactional free functions for the conversations domain
//!
//! Conversation creation writes the conversation, the creator's roster row
//! and every additional participant in one transaction.

use std::collections::HashSet;

use crate::domain::entities::{Conversation, Participant};
use sqlx::{QueryBuilder, Sqlite, Transaction};
use threadline_common::{is_unique_violation, RepositoryError};
use uuid::Uuid;

/// Insert a conversation within an existing transaction.
pub async fn create_conversation_tx(
    transaction: &mut Transaction<'_, Sqlite>,
    conv: &Conversation,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO conversations (id, name, description, created_by, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(conv.id)
    .bind(&conv.name)
    .bind(&conv.description)
    .bind(conv.created_by)
    .bind(conv.created_at)
    .bind(conv.updated_at)
    .execute(&mut **transaction)
    .await?;
    Ok(())
}

/// Insert a roster row within an existing transaction.
pub async fn add_participant_tx(
    transaction: &mut Transaction<'_, Sqlite>,
    participant: &Participant,
) -> std::result::Result<(), RepositoryError> {
    sqlx::query(
        r#"
        INSERT INTO participants (conversation_id, user_id, joined_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(participant.conversation_id)
    .bind(participant.user_id)
    .bind(participant.joined_at)
    .execute(&mut **transaction)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            RepositoryError::AlreadyExists
        } else {
            RepositoryError::from(e)
        }
    })?;
    Ok(())
}

/// Return the ids (in input order) that do not resolve to a user.
pub async fn find_missing_users_tx(
    transaction: &mut Transaction<'_, Sqlite>,
    user_ids: &[Uuid],
) -> std::result::Result<Vec<Uuid>, sqlx::Error> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT id FROM users WHERE id IN (");
    let mut ids = query.separated(", ");
    for id in user_ids {
        ids.push_bind(*id);
    }
    query.push(")");

    let found: HashSet<Uuid> = query
        .build_query_scalar::<Uuid>()
        .fetch_all(&mut **transaction)
        .await?
        .into_iter()
        .collect();

    Ok(user_ids
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect())
}
