//! Domain layer for the identity domain

pub mod entities;
pub mod error;
pub mod password;
