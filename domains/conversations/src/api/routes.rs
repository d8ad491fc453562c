//! Route definitions for conversations domain API

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{conversations, messages, participants};
use super::middleware::ConversationsState;

/// Create all conversations domain API routes
pub fn routes() -> Router<ConversationsState> {
    Router::new()
        // Conversations
        .route(
            "/conversations",
            get(conversations::list_conversations).post(conversations::create_conversation),
        )
        .route(
            "/conversations/{id}",
            get(conversations::get_conversation)
                .put(conversations::update_conversation)
                .delete(conversations::delete_conversation),
        )
        // Participants
        .route(
            "/conversations/{id}/participants",
            post(participants::add_participant),
        )
        .route(
            "/conversations/{id}/participants/{user_id}",
            delete(participants::remove_participant),
        )
        // Messages
        .route(
            "/conversations/{id}/messages",
            get(messages::list_messages).post(messages::create_message),
        )
        .route(
            "/messages/{id}",
            get(messages::get_message)
                .put(messages::update_message)
                .delete(messages::delete_message),
        )
}
