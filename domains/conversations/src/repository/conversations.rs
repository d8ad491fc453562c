//! Conversation repository

use crate::domain::entities::Conversation;
use sqlx::SqlitePool;
use threadline_common::Result;
use uuid::Uuid;

#[derive(Clone)]
pub struct ConversationRepository {
    pool: SqlitePool,
}

impl ConversationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find conversation by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Conversation>> {
        let conv = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, name, description, created_by, created_at, updated_at
            FROM conversations
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(conv)
    }

    /// List conversations the user participates in, newest first
    pub async fn list_for_participant(&self, user_id: Uuid) -> Result<Vec<Conversation>> {
        let convs = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT c.id, c.name, c.description, c.created_by, c.created_at, c.updated_at
            FROM conversations c
            INNER JOIN participants p ON p.conversation_id = c.id
            WHERE p.user_id = ?
            ORDER BY c.created_at DESC, c.rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(convs)
    }

    /// Persist name, description and updated_at
    pub async fn update(&self, conv: &Conversation) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE conversations
            SET name = ?, description = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&conv.name)
        .bind(&conv.description)
        .bind(conv.updated_at)
        .bind(conv.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a conversation; participants and messages cascade
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
