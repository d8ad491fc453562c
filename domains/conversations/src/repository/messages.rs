//! Message repository
//!
//! Reads join the author and, through a LEFT JOIN, the reply target and its
//! author. That single join is the only way reply previews are produced, so
//! they never nest deeper than one level.

use crate::domain::entities::{Message, MessageView, ReplySummary, UserSummary};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use threadline_common::{is_foreign_key_violation, Pagination, RepositoryError, Result};
use uuid::Uuid;

/// Shared SELECT for message views; callers append WHERE / ORDER BY.
const MESSAGE_VIEW_SELECT: &str = r#"
    SELECT m.id, m.conversation_id, m.user_id, m.content, m.reply_to_id,
           m.edited_at, m.created_at, m.updated_at,
           a.name AS author_name,
           r.id AS reply_id, r.content AS reply_content,
           r.user_id AS reply_author_id, ra.name AS reply_author_name
    FROM messages m
    INNER JOIN users a ON a.id = m.user_id
    LEFT JOIN messages r ON r.id = m.reply_to_id
    LEFT JOIN users ra ON ra.id = r.user_id
"#;

/// Internal row type matching `MESSAGE_VIEW_SELECT`.
#[derive(sqlx::FromRow)]
struct MessageViewRow {
    id: Uuid,
    conversation_id: Uuid,
    user_id: Uuid,
    content: String,
    reply_to_id: Option<Uuid>,
    edited_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_name: String,
    reply_id: Option<Uuid>,
    reply_content: Option<String>,
    reply_author_id: Option<Uuid>,
    reply_author_name: Option<String>,
}

impl From<MessageViewRow> for MessageView {
    fn from(row: MessageViewRow) -> Self {
        let reply_to = match (
            row.reply_id,
            row.reply_content,
            row.reply_author_id,
            row.reply_author_name,
        ) {
            (Some(id), Some(content), Some(author_id), Some(author_name)) => Some(ReplySummary {
                id,
                content,
                author: UserSummary {
                    id: author_id,
                    name: author_name,
                },
            }),
            _ => None,
        };

        MessageView {
            author: UserSummary {
                id: row.user_id,
                name: row.author_name,
            },
            message: Message {
                id: row.id,
                conversation_id: row.conversation_id,
                user_id: row.user_id,
                content: row.content,
                reply_to_id: row.reply_to_id,
                edited_at: row.edited_at,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            reply_to,
        }
    }
}

#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find message by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, conversation_id, user_id, content, reply_to_id,
                   edited_at, created_at, updated_at
            FROM messages
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    /// Find message by ID with author and reply preview
    pub async fn find_view(&self, id: Uuid) -> Result<Option<MessageView>> {
        let sql = format!("{} WHERE m.id = ?", MESSAGE_VIEW_SELECT);
        let row = sqlx::query_as::<_, MessageViewRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(MessageView::from))
    }

    /// One page of a conversation's messages, newest first, plus the total count
    pub async fn list_page(
        &self,
        conversation_id: Uuid,
        pagination: Pagination,
    ) -> Result<(Vec<MessageView>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE conversation_id = ?")
                .bind(conversation_id)
                .fetch_one(&self.pool)
                .await?;

        let sql = format!(
            "{} WHERE m.conversation_id = ? ORDER BY m.created_at DESC, m.rowid DESC LIMIT ? OFFSET ?",
            MESSAGE_VIEW_SELECT
        );
        let rows = sqlx::query_as::<_, MessageViewRow>(&sql)
            .bind(conversation_id)
            .bind(pagination.page_size())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((rows.into_iter().map(MessageView::from).collect(), total))
    }

    /// Create a new message. A conversation, author or reply target that
    /// vanished before the insert surfaces as `NotFound`.
    pub async fn create(&self, message: &Message) -> std::result::Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO messages (
                id, conversation_id, user_id, content, reply_to_id,
                edited_at, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.user_id)
        .bind(&message.content)
        .bind(message.reply_to_id)
        .bind(message.edited_at)
        .bind(message.created_at)
        .bind(message.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                RepositoryError::NotFound
            } else {
                RepositoryError::from(e)
            }
        })?;

        Ok(())
    }

    /// Persist content, edited_at and updated_at
    pub async fn update_content(&self, message: &Message) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET content = ?, edited_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&message.content)
        .bind(message.edited_at)
        .bind(message.updated_at)
        .bind(message.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a message. Replies pointing at it keep existing with
    /// `reply_to_id` cleared by the `ON DELETE SET NULL` foreign key.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
