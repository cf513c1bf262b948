//! Message store port
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{ChatMessage, NewChatMessage};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a message and return it with its store-assigned id
    async fn save(&self, message: NewChatMessage) -> RepoResult<ChatMessage>;
}
