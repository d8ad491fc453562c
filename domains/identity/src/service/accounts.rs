//! Account service
//!
//! Owns the credential and token lifecycle. Knows nothing about HTTP; the
//! API layer maps `IdentityError` to responses.

use threadline_auth::{AuthConfig, AuthContext, AuthError, TokenKind};

use crate::domain::entities::{AccessToken, User};
use crate::domain::error::IdentityError;
use crate::domain::password::{hash_password, unusable_password, verify_password};
use crate::repository::{create_token_tx, create_user_tx, delete_token_tx, IdentityRepositories};

/// A freshly issued token and its one-time plaintext value
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: AccessToken,
    pub plain_text: String,
}

impl IssuedToken {
    fn new(user_id: uuid::Uuid, kind: TokenKind, name: &str, config: &AuthConfig) -> Self {
        let (token, plain_text) = AccessToken::issue(user_id, kind, name, config.ttl_for(kind));
        Self { token, plain_text }
    }
}

#[derive(Clone)]
pub struct AccountService {
    repos: IdentityRepositories,
    config: AuthConfig,
}

impl AccountService {
    pub fn new(repos: IdentityRepositories, config: AuthConfig) -> Self {
        Self { repos, config }
    }

    /// Create a user and their first token in one transaction
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, IssuedToken), IdentityError> {
        if self.repos.users.find_by_email(email).await?.is_some() {
            return Err(IdentityError::EmailTaken);
        }

        let user = User::new(name, email, hash_password(password)?)?;
        let issued = IssuedToken::new(
            user.id,
            TokenKind::User,
            AccessToken::default_name(TokenKind::User),
            &self.config,
        );

        let mut tx = self.repos.begin().await?;
        create_user_tx(&mut tx, &user).await?;
        create_token_tx(&mut tx, &issued.token).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok((user, issued))
    }

    /// Verify credentials and issue a new user token.
    ///
    /// Unknown email and wrong password are the same failure.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(User, IssuedToken), IdentityError> {
        let user = match self.repos.users.find_by_email(email).await? {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => {
                tracing::debug!("Login rejected");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let issued = IssuedToken::new(
            user.id,
            TokenKind::User,
            AccessToken::default_name(TokenKind::User),
            &self.config,
        );

        let mut tx = self.repos.begin().await?;
        create_token_tx(&mut tx, &issued.token).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, token_id = %issued.token.id, "User logged in");
        Ok((user, issued))
    }

    /// Issue a replacement token of the same kind, optionally revoking the
    /// presented one in the same transaction.
    pub async fn refresh(
        &self,
        ctx: &AuthContext,
        revoke_current: bool,
    ) -> Result<IssuedToken, IdentityError> {
        let issued = IssuedToken::new(ctx.user.id, ctx.token.kind, &ctx.token.name, &self.config);

        let mut tx = self.repos.begin().await?;
        create_token_tx(&mut tx, &issued.token).await?;
        if revoke_current {
            delete_token_tx(&mut tx, ctx.token.id).await?;
        }
        tx.commit().await?;

        tracing::info!(
            user_id = %ctx.user.id,
            token_id = %issued.token.id,
            revoked_token_id = %ctx.token.id,
            revoked = revoke_current,
            "Access token refreshed"
        );
        Ok(issued)
    }

    /// Revoke only the presented token
    pub async fn logout(&self, ctx: &AuthContext) -> Result<(), IdentityError> {
        self.repos.tokens.delete(ctx.token.id).await?;

        tracing::info!(user_id = %ctx.user.id, token_id = %ctx.token.id, "Access token revoked");
        Ok(())
    }

    /// Create a guest user and a short-lived, restricted guest token
    pub async fn guest(&self, name: Option<&str>) -> Result<(User, IssuedToken), IdentityError> {
        let user = User::guest(name, unusable_password()?)?;
        let issued = IssuedToken::new(
            user.id,
            TokenKind::Guest,
            AccessToken::default_name(TokenKind::Guest),
            &self.config,
        );

        let mut tx = self.repos.begin().await?;
        create_user_tx(&mut tx, &user).await?;
        create_token_tx(&mut tx, &issued.token).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, "Guest user created");
        Ok((user, issued))
    }
}
