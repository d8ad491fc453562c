//! Route definitions for identity domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::auth;
use super::middleware::IdentityState;

/// Create all identity domain API routes
pub fn routes() -> Router<IdentityState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/guest", post(auth::guest))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
}
