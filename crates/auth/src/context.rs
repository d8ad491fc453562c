//! Authorization context for authenticated requests

use uuid::Uuid;

use crate::error::AuthError;
use crate::types::{abilities, AuthIdentity, AuthToken, TokenKind};

/// Represents an authenticated user plus the token they presented
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: AuthIdentity,
    pub token: AuthToken,
}

impl AuthContext {
    pub fn new(user: AuthIdentity, token: AuthToken) -> Self {
        Self { user, token }
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    /// Check if the request was made with a guest token
    pub fn is_guest(&self) -> bool {
        self.token.kind == TokenKind::Guest
    }

    /// Check if the presented token carries an ability
    pub fn has_ability(&self, ability: &str) -> bool {
        self.token
            .abilities
            .iter()
            .any(|granted| granted == abilities::ALL || granted == ability)
    }

    /// Fail with `InsufficientScope` unless the token carries the ability
    pub fn ensure_ability(&self, ability: &str) -> Result<(), AuthError> {
        if self.has_ability(ability) {
            Ok(())
        } else {
            tracing::debug!(
                user_id = %self.user.id,
                token_id = %self.token.id,
                ability = ability,
                "Token lacks required ability"
            );
            Err(AuthError::InsufficientScope(ability.to_string()))
        }
    }
}
