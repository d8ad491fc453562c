//! Repository implementations for the identity domain

pub mod tokens;
pub mod transactions;
pub mod users;

use sqlx::{Sqlite, SqlitePool, Transaction};

pub use tokens::AccessTokenRepository;
pub use transactions::{create_token_tx, create_user_tx, delete_token_tx};
pub use users::UserRepository;

/// Combined repository access for the identity domain
#[derive(Clone)]
pub struct IdentityRepositories {
    pool: SqlitePool,
    pub users: UserRepository,
    pub tokens: AccessTokenRepository,
}

impl IdentityRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            tokens: AccessTokenRepository::new(pool.clone()),
            pool,
        }
    }

    /// Begin a new database transaction.
    pub async fn begin(&self) -> std::result::Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }
}
