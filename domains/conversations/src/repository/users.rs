//! Read-only view of users for roster management
//!
//! The identity domain owns the `users` table; this side only needs to know
//! whether ids resolve.

use sqlx::SqlitePool;
use threadline_common::Result;
use uuid::Uuid;

#[derive(Clone)]
pub struct UserDirectory {
    pool: SqlitePool,
}

impl UserDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Whether a user with this id exists
    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}
