//! Access token repository

use crate::domain::entities::AccessToken;
use sqlx::SqlitePool;
use threadline_common::Result;
use uuid::Uuid;

#[derive(Clone)]
pub struct AccessTokenRepository {
    pool: SqlitePool,
}

impl AccessTokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get token by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<AccessToken>> {
        let token = sqlx::query_as::<_, AccessToken>(
            r#"
            SELECT id, user_id, name, kind, token_hash, abilities,
                   last_used_at, expires_at, created_at
            FROM access_tokens
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    /// Revoke a token. Returns whether a row was deleted.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count live tokens for a user
    pub async fn count_for_user(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM access_tokens WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
