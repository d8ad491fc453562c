//! Participant roster repository

use crate::domain::entities::{Participant, RosterEntry};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use threadline_common::{is_unique_violation, RepositoryError, Result};
use uuid::Uuid;

/// Conversation ids bound per roster query
const ROSTER_CHUNK_SIZE: usize = 500;

#[derive(Clone)]
pub struct ParticipantRepository {
    pool: SqlitePool,
}

impl ParticipantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Whether a roster row exists for the pair
    pub async fn exists(&self, conversation_id: Uuid, user_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM participants
                WHERE conversation_id = ? AND user_id = ?
            )
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Insert a roster row. The composite primary key turns a duplicate
    /// pair into `AlreadyExists`, including under concurrent inserts.
    pub async fn create(
        &self,
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
        .execute(&self.pool)
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

    /// Remove a roster row. Returns whether a row was deleted.
    pub async fn delete(&self, conversation_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM participants WHERE conversation_id = ? AND user_id = ?")
                .bind(conversation_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get one roster entry with the user's name
    pub async fn get(&self, conversation_id: Uuid, user_id: Uuid) -> Result<Option<RosterEntry>> {
        let entry = sqlx::query_as::<_, RosterEntry>(
            r#"
            SELECT p.conversation_id, p.user_id, u.name, p.joined_at
            FROM participants p
            INNER JOIN users u ON u.id = p.user_id
            WHERE p.conversation_id = ? AND p.user_id = ?
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Full roster of one conversation, in join order
    pub async fn roster(&self, conversation_id: Uuid) -> Result<Vec<RosterEntry>> {
        self.rosters(&[conversation_id]).await
    }

    /// Rosters of many conversations, in join order within each conversation.
    /// Ids are queried in chunks to stay under SQLite's bound-parameter limit.
    pub async fn rosters(&self, conversation_ids: &[Uuid]) -> Result<Vec<RosterEntry>> {
        let mut entries = Vec::new();

        for chunk in conversation_ids.chunks(ROSTER_CHUNK_SIZE) {
            let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
                r#"
                SELECT p.conversation_id, p.user_id, u.name, p.joined_at
                FROM participants p
                INNER JOIN users u ON u.id = p.user_id
                WHERE p.conversation_id IN (
                "#,
            );
            let mut ids = query.separated(", ");
            for id in chunk {
                ids.push_bind(*id);
            }
            query.push(") ORDER BY p.joined_at ASC, p.rowid ASC");

            entries.extend(
                query
                    .build_query_as::<RosterEntry>()
                    .fetch_all(&self.pool)
                    .await?,
            );
        }

        Ok(entries)
    }
}
