//! Domain layer for the conversations domain

pub mod entities;
pub mod error;
pub mod state;
