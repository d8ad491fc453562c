//! Account operations: registration, login, token rotation, guests

pub mod accounts;

pub use accounts::{AccountService, IssuedToken};
