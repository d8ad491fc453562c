//! Opaque token format and bearer header helpers
//!
//! A plaintext token reads `{token_id}|{secret}`: the id locates the row,
//! the secret is verified against the stored salted hash.

use axum::http::HeaderValue;
use uuid::Uuid;

use crate::error::AuthError;

/// Number of random characters in a token secret
pub const TOKEN_SECRET_LENGTH: usize = 40;

/// Build the plaintext token handed to the client
pub fn compose_token(token_id: Uuid, secret: &str) -> String {
    format!("{}|{}", token_id.simple(), secret)
}

/// Split a plaintext token into its row id and secret
pub fn parse_token(raw: &str) -> Result<(Uuid, &str), AuthError> {
    let (id, secret) = raw.split_once('|').ok_or(AuthError::InvalidToken)?;
    let token_id = Uuid::parse_str(id).map_err(|_| AuthError::InvalidToken)?;

    if secret.is_empty() {
        return Err(AuthError::InvalidToken);
    }

    Ok((token_id, secret))
}

/// Extract bearer token from Authorization header
pub(crate) fn extract_bearer_token(header: &HeaderValue) -> Result<String, AuthError> {
    let header_str = header
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorizationFormat)?;

    match header_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AuthError::InvalidAuthorizationFormat),
    }
}
