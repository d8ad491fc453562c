//! Authentication middleware for the Threadline API
//!
//! Provides opaque bearer-token validation, ability checks, and axum extractors
//! that work with any domain state implementing `FromRef<S>` for `AuthBackend`.

mod backend;
mod config;
mod context;
mod error;
mod extractors;
mod token;
mod types;

pub use backend::AuthBackend;
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::AuthUser;
pub use token::{compose_token, parse_token, TOKEN_SECRET_LENGTH};
pub use types::{abilities, AuthIdentity, AuthToken, TokenKind};
