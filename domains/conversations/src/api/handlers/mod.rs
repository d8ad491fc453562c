//! HTTP handlers for the conversations domain

pub mod conversations;
pub mod messages;
pub mod participants;
