//! Auth read-model types
//!
//! Lightweight views of the rows owned by the identity domain.
//! These types carry only the fields needed for authentication and authorization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// Ability names carried by access tokens
pub mod abilities {
    /// Grants every ability
    pub const ALL: &str = "*";
    pub const CONVERSATIONS_READ: &str = "conversations:read";
    pub const CONVERSATIONS_WRITE: &str = "conversations:write";
    pub const PARTICIPANTS_WRITE: &str = "participants:write";
    pub const MESSAGES_READ: &str = "messages:read";
    pub const MESSAGES_WRITE: &str = "messages:write";
}

/// Lightweight identity for authenticated users (no password hash)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthIdentity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub is_guest: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Access token type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    User,
    Guest,
}

impl TokenKind {
    /// Abilities granted to a freshly issued token of this kind
    pub fn default_abilities(&self) -> Vec<String> {
        match self {
            TokenKind::User => vec![abilities::ALL.to_string()],
            TokenKind::Guest => vec![
                abilities::CONVERSATIONS_READ.to_string(),
                abilities::MESSAGES_READ.to_string(),
                abilities::MESSAGES_WRITE.to_string(),
            ],
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::User => write!(f, "user"),
            TokenKind::Guest => write!(f, "guest"),
        }
    }
}

/// Authenticated access token, excluding the sensitive `token_hash` column.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: TokenKind,
    pub abilities: Json<Vec<String>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
