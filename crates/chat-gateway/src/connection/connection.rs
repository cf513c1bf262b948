//! Individual WebSocket connection
//!
//! Represents a single WebSocket connection and its state.

use crate::protocol::GatewayMessage;
use chat_core::Topic;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, RwLock};

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// Socket open, no username bound yet
    Open,
    /// A username has been bound through Join
    Joined,
    /// Connection is closed
    Closed,
}

/// A single WebSocket connection
pub struct Connection {
    /// Unique session ID
    session_id: String,

    /// Username bound by the latest Join (None until then)
    username: RwLock<Option<String>>,

    /// Current connection state
    state: RwLock<ConnectionState>,

    /// Channel to send messages to the WebSocket
    sender: mpsc::Sender<GatewayMessage>,

    /// Last sequence number sent
    sequence: AtomicU64,

    /// Last heartbeat received
    last_heartbeat: RwLock<Instant>,

    /// Topics this connection is subscribed to
    topics: RwLock<HashSet<Topic>>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(session_id: String, sender: mpsc::Sender<GatewayMessage>) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            username: RwLock::new(None),
            state: RwLock::new(ConnectionState::Open),
            sender,
            sequence: AtomicU64::new(0),
            last_heartbeat: RwLock::new(Instant::now()),
            topics: RwLock::new(HashSet::new()),
            created_at: Instant::now(),
        })
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get the bound username
    pub async fn username(&self) -> Option<String> {
        self.username.read().await.clone()
    }

    /// Bind a username to this connection
    pub async fn set_username(&self, username: String) {
        *self.username.write().await = Some(username);
        self.set_state_unless_closed(ConnectionState::Joined).await;
    }

    /// Unbind the username if it is `username`
    ///
    /// Returns true when the binding was cleared.
    pub async fn clear_username_if(&self, username: &str) -> bool {
        let mut bound = self.username.write().await;
        if bound.as_deref() == Some(username) {
            *bound = None;
            drop(bound);
            self.set_state_unless_closed(ConnectionState::Open).await;
            true
        } else {
            false
        }
    }

    /// Hold the username binding, stalling any join on this connection
    #[cfg(test)]
    pub(crate) async fn hold_username(&self) -> tokio::sync::RwLockWriteGuard<'_, Option<String>> {
        self.username.write().await
    }

    /// Get the current state
    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    /// Set the connection state
    pub async fn set_state(&self, state: ConnectionState) {
        *self.state.write().await = state;
    }

    async fn set_state_unless_closed(&self, state: ConnectionState) {
        let mut current = self.state.write().await;
        if *current != ConnectionState::Closed {
            *current = state;
        }
    }

    /// Get the next sequence number
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Get the current sequence number
    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Record a heartbeat received
    pub async fn record_heartbeat(&self) {
        *self.last_heartbeat.write().await = Instant::now();
    }

    /// Get time since last heartbeat
    pub async fn time_since_heartbeat(&self) -> std::time::Duration {
        self.last_heartbeat.read().await.elapsed()
    }

    /// Add a topic subscription
    ///
    /// Returns false if already subscribed.
    pub async fn subscribe(&self, topic: Topic) -> bool {
        self.topics.write().await.insert(topic)
    }

    /// Remove a topic subscription
    pub async fn unsubscribe(&self, topic: Topic) -> bool {
        self.topics.write().await.remove(&topic)
    }

    /// Get all subscribed topics
    pub async fn topics(&self) -> Vec<Topic> {
        self.topics.read().await.iter().copied().collect()
    }

    /// Check if subscribed to a topic
    pub async fn is_subscribed_to(&self, topic: Topic) -> bool {
        self.topics.read().await.contains(&topic)
    }

    /// Send a message to this connection
    pub async fn send(&self, message: GatewayMessage) -> Result<(), mpsc::error::SendError<GatewayMessage>> {
        self.sender.send(message).await
    }

    /// Try to send a message (non-blocking)
    pub fn try_send(&self, message: GatewayMessage) -> Result<(), mpsc::error::TrySendError<GatewayMessage>> {
        self.sender.try_send(message)
    }

    /// Check if the sender channel is closed
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("sequence", &self.sequence.load(Ordering::SeqCst))
            .field("created_at", &self.created_at)
            .finish()
    }
}
