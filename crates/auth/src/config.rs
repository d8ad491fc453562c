//! Authentication configuration

use chrono::Duration;
use threadline_common::config::Config;

use crate::types::TokenKind;

/// Access token lifetimes
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub user_token_ttl: Duration,
    pub guest_token_ttl: Duration,
}

impl AuthConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            user_token_ttl: Duration::minutes(config.token_ttl_minutes),
            guest_token_ttl: Duration::minutes(config.guest_token_ttl_minutes),
        }
    }

    /// Lifetime of a newly issued token of the given kind
    pub fn ttl_for(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::User => self.user_token_ttl,
            TokenKind::Guest => self.guest_token_ttl,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_token_ttl: Duration::days(7),
            guest_token_ttl: Duration::hours(24),
        }
    }
}
