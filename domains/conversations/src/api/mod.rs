//! API layer for the conversations domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::ConversationsState;
pub use routes::routes;
