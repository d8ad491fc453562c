//! Identity domain errors

use axum::response::{IntoResponse, Response};
use threadline_auth::AuthError;
use threadline_common::{Error, RepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("The email has already been taken.")]
    EmailTaken,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Common(#[from] Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<RepositoryError> for IdentityError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // users.email is the only unique column a caller can collide on
            RepositoryError::AlreadyExists => IdentityError::EmailTaken,
            RepositoryError::NotFound => {
                IdentityError::Common(Error::NotFound("User not found".to_string()))
            }
            RepositoryError::Connection(e) => IdentityError::Database(e),
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        match self {
            IdentityError::EmailTaken => {
                Error::field("email", "The email has already been taken.").into_response()
            }
            IdentityError::Auth(e) => e.into_response(),
            IdentityError::Common(e) => e.into_response(),
            IdentityError::Database(e) => Error::Database(e).into_response(),
        }
    }
}
