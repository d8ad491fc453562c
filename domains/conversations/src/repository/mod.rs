//! Repository implementations for the conversations domain

pub mod conversations;
pub mod messages;
pub mod participants;
pub mod transactions;
pub mod users;

use sqlx::{Sqlite, SqlitePool, Transaction};

pub use conversations::ConversationRepository;
pub use messages::MessageRepository;
pub use participants::ParticipantRepository;
pub use transactions::{add_participant_tx, create_conversation_tx, find_missing_users_tx};
pub use users::UserDirectory;

/// Combined repository access for the conversations domain
#[derive(Clone)]
pub struct ConversationsRepositories {
    pool: SqlitePool,
    pub conversations: ConversationRepository,
    pub participants: ParticipantRepository,
    pub messages: MessageRepository,
    pub users: UserDirectory,
}

impl ConversationsRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            conversations: ConversationRepository::new(pool.clone()),
            participants: ParticipantRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            users: UserDirectory::new(pool.clone()),
            pool,
        }
    }

    /// Begin a new database transaction.
    pub async fn begin(&self) -> std::result::Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }
}
