//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use async_trait::async_trait;
use chat_core::{ChatMessage, DomainError, MessageStore, NewChatMessage, RepoResult};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A username no other test uses
pub fn unique_username() -> String {
    format!("user{}", unique_suffix())
}

/// Op 4 payload
pub fn join_payload(username: &str) -> Value {
    json!({ "username": username })
}

/// Op 7 payload
pub fn message_payload(sender: &str, content: &str) -> Value {
    json!({ "sender": sender, "content": content })
}

/// Store whose backend is always down
pub struct UnavailableStore;

#[async_trait]
impl MessageStore for UnavailableStore {
    async fn save(&self, _message: NewChatMessage) -> RepoResult<ChatMessage> {
        Err(DomainError::StoreUnavailable("pool closed".to_string()))
    }
}
