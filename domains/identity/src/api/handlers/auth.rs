//! Authentication API handlers
//!
//! Implements:
//! - POST /auth/register: Create an account and its first token
//! - POST /auth/login: Exchange credentials for a token
//! - POST /auth/guest: Create a guest account with a restricted token
//! - POST /auth/refresh: Rotate the presented token
//! - POST /auth/logout: Revoke the presented token
//! - GET  /auth/me: Return the caller and their token metadata

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use threadline_auth::{AuthUser, TokenKind};
use threadline_common::{Error, ValidatedJson};
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::api::middleware::IdentityState;
use crate::domain::entities::User;
use crate::domain::error::IdentityError;
use crate::service::IssuedToken;

type Result<T> = std::result::Result<T, IdentityError>;

fn validate_not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Emails are stored trimmed, so surrounding whitespace is not an error.
fn validate_email_address(email: &str) -> std::result::Result<(), ValidationError> {
    if !email.trim().validate_email() {
        return Err(ValidationError::new("email"));
    }
    Ok(())
}

// ============================================================
// DTOs
// ============================================================

/// Public view of a user
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_guest: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            is_guest: user.is_guest,
            created_at: user.created_at,
        }
    }
}

/// Newly issued token. `access_token` is only ever shown here.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub kind: TokenKind,
    pub abilities: Vec<String>,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            access_token: issued.plain_text,
            token_type: "Bearer",
            kind: issued.token.kind,
            abilities: issued.token.abilities.0,
            expires_at: issued.token.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: TokenResponse,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: TokenResponse,
}

/// Token metadata for `GET /auth/me` (never the secret)
#[derive(Debug, Serialize)]
pub struct TokenInfo {
    pub id: Uuid,
    pub name: String,
    pub kind: TokenKind,
    pub abilities: Vec<String>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub token: TokenInfo,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 255, message = "The name must be between 1 and 255 characters."),
        custom(function = "validate_not_blank", message = "The name field is required.")
    )]
    pub name: String,
    #[validate(custom(function = "validate_email_address", message = "The email must be a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, max = 255, message = "The password must be at least 8 characters."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "The email field is required."))]
    pub email: String,
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct GuestRequest {
    #[validate(
        length(min = 1, max = 255, message = "The name must be between 1 and 255 characters."),
        custom(function = "validate_not_blank", message = "The name field is required.")
    )]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshParams {
    pub revoke_current: Option<bool>,
}

// ============================================================
// Handlers
// ============================================================

/// POST /auth/register: Create an account and its first token
pub async fn register(
    State(state): State<IdentityState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let (user, issued) = state
        .accounts()
        .register(&request.name, request.email.trim(), &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token: issued.into(),
        }),
    ))
}

/// POST /auth/login: Exchange credentials for a token
pub async fn login(
    State(state): State<IdentityState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let (user, issued) = state
        .accounts()
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(AuthResponse {
        user: user.into(),
        token: issued.into(),
    }))
}

/// POST /auth/guest: Create a guest account. The body is optional.
pub async fn guest(
    State(state): State<IdentityState>,
    body: Bytes,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let request: GuestRequest = if body.iter().all(u8::is_ascii_whitespace) {
        GuestRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| Error::Validation(e.to_string()))?
    };
    request
        .validate()
        .map_err(|e| Error::InvalidFields(e.into()))?;

    let (user, issued) = state.accounts().guest(request.name.as_deref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token: issued.into(),
        }),
    ))
}

/// POST /auth/refresh: Issue a new token; revokes the current one unless
/// `?revoke_current=false`
pub async fn refresh(
    AuthUser(auth_context): AuthUser,
    State(state): State<IdentityState>,
    Query(params): Query<RefreshParams>,
) -> Result<Json<RefreshResponse>> {
    let issued = state
        .accounts()
        .refresh(&auth_context, params.revoke_current.unwrap_or(true))
        .await?;

    Ok(Json(RefreshResponse {
        token: issued.into(),
    }))
}

/// POST /auth/logout: Revoke the presented token
pub async fn logout(
    AuthUser(auth_context): AuthUser,
    State(state): State<IdentityState>,
) -> Result<StatusCode> {
    state.accounts().logout(&auth_context).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me: Return the caller and their token metadata
pub async fn me(
    AuthUser(auth_context): AuthUser,
    State(state): State<IdentityState>,
) -> Result<Json<MeResponse>> {
    let user = state
        .repos
        .users
        .get_by_id(auth_context.user.id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    let token = auth_context.token;
    Ok(Json(MeResponse {
        user: user.into(),
        token: TokenInfo {
            id: token.id,
            name: token.name,
            kind: token.kind,
            abilities: token.abilities.0,
            expires_at: token.expires_at,
        },
    }))
}
