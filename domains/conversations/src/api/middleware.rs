//! Conversations domain state and auth backend integration

use crate::repository::ConversationsRepositories;
use crate::service::{ConversationService, MessageService};
use axum::extract::FromRef;
use threadline_auth::AuthBackend;

/// Application state for the conversations domain
#[derive(Clone)]
pub struct ConversationsState {
    pub repos: ConversationsRepositories,
    pub auth: AuthBackend,
}

impl ConversationsState {
    pub fn conversations(&self) -> ConversationService {
        ConversationService::new(self.repos.clone())
    }

    pub fn messages(&self) -> MessageService {
        MessageService::new(self.repos.clone())
    }
}

impl FromRef<ConversationsState> for AuthBackend {
    fn from_ref(state: &ConversationsState) -> Self {
        state.auth.clone()
    }
}
