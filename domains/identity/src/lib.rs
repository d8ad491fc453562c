//! Identity domain: users, password credentials, access tokens

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::error::IdentityError;

// Re-export repository types
pub use repository::{
    create_token_tx, create_user_tx, delete_token_tx, AccessTokenRepository,
    IdentityRepositories, UserRepository,
};

pub use service::{AccountService, IssuedToken};

// Re-export API types
pub use api::routes;
pub use api::IdentityState;
