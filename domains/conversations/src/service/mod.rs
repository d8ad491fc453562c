//! Core operations of the conversations domain
//!
//! Every read and write path goes through `AuthorizationService` first.
//! Services take persistence handles at construction and hold no other state.

pub mod authorization;
pub mod conversations;
pub mod messages;

pub use authorization::AuthorizationService;
pub use conversations::ConversationService;
pub use messages::MessageService;
