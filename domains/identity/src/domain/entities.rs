//! Domain entities for the identity domain

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::types::Json;
use threadline_auth::{compose_token, TokenKind, TOKEN_SECRET_LENGTH};
use threadline_common::{generate_secret, hash_key, Error, Result};
use uuid::Uuid;
use validator::ValidateEmail;

/// Maximum length of a display name
pub const MAX_NAME_LENGTH: usize = 255;

/// Display name given to guests who do not pick one
pub const DEFAULT_GUEST_NAME: &str = "Guest";

/// Domain for synthetic guest email addresses
const GUEST_EMAIL_DOMAIN: &str = "guest.threadline.invalid";

/// Trim and lower-case an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User account
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_guest: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a registered user from an already hashed password
    pub fn new(name: &str, email: &str, password_hash: String) -> Result<Self> {
        let email = normalize_email(email);
        if !email.validate_email() {
            return Err(Error::field("email", "The email must be a valid email address."));
        }

        let name = Self::validate_name(name)?;
        let now = Utc::now();
        Ok(User {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            is_guest: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Create a guest user with a synthetic, unique email address
    pub fn guest(name: Option<&str>, password_hash: String) -> Result<Self> {
        let name = Self::validate_name(name.unwrap_or(DEFAULT_GUEST_NAME))?;
        let id = Uuid::new_v4();
        let now = Utc::now();
        Ok(User {
            id,
            email: format!("guest-{}@{}", id.simple(), GUEST_EMAIL_DOMAIN),
            name,
            password_hash,
            is_guest: true,
            created_at: now,
            updated_at: now,
        })
    }

    fn validate_name(name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
            return Err(Error::field(
                "name",
                "The name must be between 1 and 255 characters.",
            ));
        }
        Ok(name.to_string())
    }
}

/// Stored access token. Only the salted hash of the secret is kept.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccessToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: TokenKind,
    pub token_hash: String,
    pub abilities: Json<Vec<String>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AccessToken {
    /// Default token name for a kind
    pub fn default_name(kind: TokenKind) -> &'static str {
        match kind {
            TokenKind::User => "auth_token",
            TokenKind::Guest => "guest_token",
        }
    }

    /// Issue a new token.
    ///
    /// Returns the entity to persist and the plaintext `{id}|{secret}`
    /// value, which is never stored and must be handed to the client now.
    pub fn issue(
        user_id: Uuid,
        kind: TokenKind,
        name: &str,
        ttl: Duration,
    ) -> (Self, String) {
        let id = Uuid::new_v4();
        let secret = generate_secret(TOKEN_SECRET_LENGTH);
        let now = Utc::now();

        let token = AccessToken {
            id,
            user_id,
            name: name.to_string(),
            kind,
            token_hash: hash_key(&secret),
            abilities: Json(kind.default_abilities()),
            last_used_at: None,
            expires_at: now + ttl,
            created_at: now,
        };

        (token, compose_token(id, &secret))
    }
}
