//! In-memory message store for single-node deployments and tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::instrument;

use chat_core::entities::{ChatMessage, NewChatMessage};
use chat_core::traits::{MessageStore, RepoResult};

/// Messages retained by [`MemoryMessageStore::new`].
pub const DEFAULT_RETAINED_MESSAGES: usize = 1000;

/// Process-local message store.
///
/// Ids start at 1 and increase monotonically, like an identity column.
/// Only the most recent `capacity` messages are retained; older ones are
/// dropped as new ones arrive, while ids keep counting.
#[derive(Debug)]
pub struct MemoryMessageStore {
    next_id: AtomicI64,
    capacity: usize,
    messages: RwLock<VecDeque<ChatMessage>>,
}

impl MemoryMessageStore {
    /// Creates an empty store retaining [`DEFAULT_RETAINED_MESSAGES`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RETAINED_MESSAGES)
    }

    /// Creates an empty store retaining at most `capacity` messages (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            next_id: AtomicI64::new(1),
            capacity,
            messages: RwLock::new(VecDeque::with_capacity(capacity.min(DEFAULT_RETAINED_MESSAGES))),
        }
    }

    /// Maximum number of retained messages.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained messages.
    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }

    /// Copy of the retained messages, oldest first.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read().iter().cloned().collect()
    }
}

impl Default for MemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    #[instrument(skip(self, message), fields(sender = %message.sender))]
    async fn save(&self, message: NewChatMessage) -> RepoResult<ChatMessage> {
        // Ids are taken under the lock so the retained tail stays in id order
        let mut messages = self.messages.write();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let saved = message.into_saved(id);
        if messages.len() == self.capacity {
            messages.pop_front();
        }
        messages.push_back(saved.clone());
        Ok(saved)
    }
}
