//! Conversations domain: rooms, participant rosters, threaded messages

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    Conversation, ConversationDetails, ConversationPatch, Message, MessageView, NewConversation,
    Participant, ReplySummary, RosterEntry, UserSummary,
};
pub use domain::error::ChatError;
pub use domain::state::{MessageEvent, MessageState, MessageStateMachine, StateError};

// Re-export repository types
pub use repository::{
    ConversationRepository, ConversationsRepositories, MessageRepository, ParticipantRepository,
    UserDirectory,
};

// Re-export service types
pub use service::{AuthorizationService, ConversationService, MessageService};

// Re-export API types
pub use api::routes;
pub use api::ConversationsState;
