//! Chat message entity
//!
//! A message exists in two forms: the inbound draft a client submits
//! ([`NewChatMessage`], no identity yet) and the canonical value returned by
//! the store ([`ChatMessage`]) carrying the store-assigned id.

use serde::{Deserialize, Serialize};

/// Message as submitted by a client, before persistence
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewChatMessage {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub content: String,
}

impl NewChatMessage {
    /// Create a new draft message
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
        }
    }

    /// Attach a store-assigned id, producing the canonical message
    pub fn into_saved(self, id: i64) -> ChatMessage {
        ChatMessage {
            id,
            sender: self.sender,
            content: self.content,
        }
    }
}

/// Persisted chat message, as broadcast on the messages topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub sender: String,
    pub content: String,
}

impl ChatMessage {
    /// Get a truncated preview of the message (for log lines)
    pub fn preview(&self, max_len: usize) -> &str {
        if self.content.len() <= max_len {
            &self.content
        } else {
            let mut end = max_len;
            while !self.content.is_char_boundary(end) && end > 0 {
                end -= 1;
            }
            &self.content[..end]
        }
    }
}
