//! PostgreSQL implementation of MessageStore

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::{ChatMessage, NewChatMessage};
use chat_core::traits::{MessageStore, RepoResult};

use crate::models::ChatMessageModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MessageStore
///
/// Ids come from the table's `BIGSERIAL` column.
#[derive(Clone)]
pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    /// Create a new PgMessageStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    #[instrument(skip(self, message), fields(sender = %message.sender))]
    async fn save(&self, message: NewChatMessage) -> RepoResult<ChatMessage> {
        let row = sqlx::query_as::<_, ChatMessageModel>(
            r#"
            INSERT INTO chat_messages (sender, content)
            VALUES ($1, $2)
            RETURNING id, sender, content
            "#,
        )
        .bind(&message.sender)
        .bind(&message.content)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ChatMessage::from(row))
    }
}
