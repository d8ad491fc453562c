//! Shared utilities, configuration, and error handling for Threadline
//!
//! This crate provides common functionality used across the Threadline workspace:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - Database pool construction and embedded migrations
//! - Secret generation and hashing for access tokens

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod extractors;
pub mod state;

pub use crypto::{generate_secret, hash_key, verify_key_hash};
pub use db::{is_foreign_key_violation, is_unique_violation, RepositoryError};
pub use error::{Error, FieldErrors, Result};
pub use extractors::{Page, PageMeta, Pagination, ValidatedJson};
pub use state::StateError;
