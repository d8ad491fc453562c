//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingAuthorization,

    #[error("Invalid authorization header format")]
    InvalidAuthorizationFormat,

    #[error("Invalid access token")]
    InvalidToken,

    #[error("Access token has expired")]
    ExpiredToken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    /// Token lacks the ability required by the operation
    #[error("Token lacks the '{0}' ability")]
    InsufficientScope(String),

    #[error("Authentication failed")]
    AuthenticationFailed,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InsufficientScope(_) => StatusCode::FORBIDDEN,
            AuthError::AuthenticationFailed => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthorization => "MISSING_AUTHORIZATION",
            AuthError::InvalidAuthorizationFormat => "INVALID_AUTHORIZATION",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::ExpiredToken => "TOKEN_EXPIRED",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::InsufficientScope(_) => "INSUFFICIENT_SCOPE",
            AuthError::AuthenticationFailed => "AUTH_ERROR",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));

        (self.status_code(), body).into_response()
    }
}
