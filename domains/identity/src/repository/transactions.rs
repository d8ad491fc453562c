//! Transaction-aware free functions for the identity domain
//!
//! Used when several writes must land together (user + first token,
//! token rotation on refresh).

use crate::domain::entities::{AccessToken, User};
use sqlx::{Sqlite, Transaction};
use threadline_common::{is_unique_violation, RepositoryError, Result};
use uuid::Uuid;

/// Insert a user. A duplicate email surfaces as `AlreadyExists`.
pub async fn create_user_tx(
    tx: &mut Transaction<'_, Sqlite>,
    user: &User,
) -> std::result::Result<(), RepositoryError> {
    sqlx::query(
        r#"
        INSERT INTO users (id, email, name, password_hash, is_guest, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.password_hash)
    .bind(user.is_guest)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(&mut **tx)
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

/// Insert an access token
pub async fn create_token_tx(
    tx: &mut Transaction<'_, Sqlite>,
    token: &AccessToken,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO access_tokens (
            id, user_id, name, kind, token_hash, abilities,
            last_used_at, expires_at, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(token.id)
    .bind(token.user_id)
    .bind(&token.name)
    .bind(token.kind)
    .bind(&token.token_hash)
    .bind(&token.abilities)
    .bind(token.last_used_at)
    .bind(token.expires_at)
    .bind(token.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Delete an access token
pub async fn delete_token_tx(tx: &mut Transaction<'_, Sqlite>, id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM access_tokens WHERE id = ?")
        .bind(id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}
