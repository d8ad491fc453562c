//! Threadline application composition root
//!
//! Composes all domain routers into a single application.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use threadline_auth::{AuthBackend, AuthConfig};
use threadline_common::config::Config;
use threadline_conversations::{ConversationsRepositories, ConversationsState};
use threadline_identity::{IdentityRepositories, IdentityState};

/// Create the main application router with all domain routes.
///
/// Transport layers (tracing, CORS) are added by the binary.
pub fn create_app(config: &Config, pool: SqlitePool) -> Router {
    let auth = AuthBackend::new(pool.clone(), AuthConfig::from_config(config));

    let identity_state = IdentityState {
        repos: IdentityRepositories::new(pool.clone()),
        auth: auth.clone(),
    };

    let conversations_state = ConversationsState {
        repos: ConversationsRepositories::new(pool),
        auth,
    };

    Router::new()
        .route("/health", get(health_check))
        .merge(threadline_identity::routes().with_state(identity_state))
        .merge(threadline_conversations::routes().with_state(conversations_state))
}

/// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
