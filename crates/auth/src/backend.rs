//! Concrete authentication backend
//!
//! Wraps `SqlitePool` + `AuthConfig` and owns auth-specific SQL queries.
//! Uses runtime `sqlx::query_as` (not macros), reading the same rows the
//! identity domain writes.

use chrono::Utc;
use sqlx::SqlitePool;
use threadline_common::verify_key_hash;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::token::parse_token;
use crate::types::{AuthIdentity, AuthToken};

/// Row type for token lookup (includes token_hash for verification)
#[derive(sqlx::FromRow)]
struct TokenRow {
    #[sqlx(flatten)]
    token: AuthToken,
    token_hash: String,
}

/// Concrete authentication backend.
///
/// Wraps a database pool and auth configuration. Provides methods
/// to resolve bearer tokens into users.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    pool: SqlitePool,
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(pool: SqlitePool, config: AuthConfig) -> Self {
        Self { pool, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Find user identity by ID (read model, lightweight subset of User)
    pub(crate) async fn find_user(&self, id: Uuid) -> Result<Option<AuthIdentity>, AuthError> {
        let user: Option<AuthIdentity> = sqlx::query_as(
            r#"
            SELECT id, email, name, is_guest, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %id, "Failed to load user");
            AuthError::AuthenticationFailed
        })?;

        Ok(user)
    }

    async fn find_token(&self, id: Uuid) -> Result<Option<TokenRow>, AuthError> {
        sqlx::query_as(
            r#"
            SELECT id, user_id, name, kind, abilities, last_used_at,
                   expires_at, created_at, token_hash
            FROM access_tokens
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, token_id = %id, "Failed to query access token");
            AuthError::AuthenticationFailed
        })
    }

    /// Resolve a plaintext bearer token into an authenticated context.
    ///
    /// Unknown ids and wrong secrets are indistinguishable to the caller
    /// (`InvalidToken`); expiry is reported separately.
    pub async fn authenticate_token(&self, raw: &str) -> Result<AuthContext, AuthError> {
        let (token_id, secret) = parse_token(raw)?;

        let row = self
            .find_token(token_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !verify_key_hash(secret, &row.token_hash) {
            tracing::debug!(token_id = %token_id, "Access token secret mismatch");
            return Err(AuthError::InvalidToken);
        }

        let now = Utc::now();
        if row.token.is_expired_at(now) {
            return Err(AuthError::ExpiredToken);
        }

        let user = self
            .find_user(row.token.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // Update last_used_at (best-effort, don't fail auth on touch error)
        if let Err(e) = sqlx::query("UPDATE access_tokens SET last_used_at = ? WHERE id = ?")
            .bind(now)
            .bind(token_id)
            .execute(&self.pool)
            .await
        {
            tracing::warn!(error = %e, token_id = %token_id, "Failed to update access token last_used_at");
        }

        Ok(AuthContext::new(user, row.token))
    }
}
