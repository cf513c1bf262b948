//! Test doubles for the store and broadcaster ports

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use chat_core::{
    BroadcastError, BroadcastResult, ChatMessage, DomainError, MessageStore, NewChatMessage,
    RepoResult, Topic, TopicBroadcaster,
};

/// Records every publish in order
#[derive(Debug, Default)]
pub struct RecordingBroadcaster {
    published: Mutex<Vec<(Topic, Value)>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts attempts but rejects every publish
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn published(&self) -> Vec<(Topic, Value)> {
        self.published.lock().clone()
    }

    pub fn on(&self, topic: Topic) -> Vec<Value> {
        self.published
            .lock()
            .iter()
            .filter(|(t, _)| *t == topic)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

#[async_trait]
impl TopicBroadcaster for RecordingBroadcaster {
    async fn publish(&self, topic: Topic, payload: Value) -> BroadcastResult<usize> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(BroadcastError::ChannelClosed);
        }
        self.published.lock().push((topic, payload));
        Ok(1)
    }
}

/// Assigns the same id to every message
#[derive(Debug)]
pub struct FixedIdStore {
    id: i64,
    saves: AtomicUsize,
}

impl FixedIdStore {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            saves: AtomicUsize::new(0),
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageStore for FixedIdStore {
    async fn save(&self, message: NewChatMessage) -> RepoResult<ChatMessage> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(message.into_saved(self.id))
    }
}

/// Rejects every save
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl MessageStore for FailingStore {
    async fn save(&self, _message: NewChatMessage) -> RepoResult<ChatMessage> {
        Err(DomainError::DatabaseError("connection refused".to_string()))
    }
}
