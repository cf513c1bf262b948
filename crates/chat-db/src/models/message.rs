//! Message database model

use sqlx::FromRow;

/// Database model for the chat_messages table
#[derive(Debug, Clone, FromRow)]
pub struct ChatMessageModel {
    pub id: i64,
    pub sender: String,
    pub content: String,
}
