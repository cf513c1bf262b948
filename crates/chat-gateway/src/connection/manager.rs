//! Connection manager
//!
//! Manages all active WebSocket connections using DashMap for thread-safe access.

use super::Connection;
use crate::protocol::GatewayMessage;
use chat_core::Topic;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Manages all active WebSocket connections
///
/// Uses `DashMap` for concurrent access to connection state.
pub struct ConnectionManager {
    /// Active connections by session ID
    connections: DashMap<String, Arc<Connection>>,

    /// Topic to session IDs mapping
    topic_connections: DashMap<Topic, HashSet<String>>,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            topic_connections: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection
    pub fn add_connection(
        &self,
        session_id: String,
        sender: mpsc::Sender<GatewayMessage>,
    ) -> Arc<Connection> {
        let connection = Connection::new(session_id.clone(), sender);
        self.connections.insert(session_id.clone(), connection.clone());

        tracing::debug!(session_id = %session_id, "Connection added");

        connection
    }

    /// Remove a connection and all of its subscriptions
    ///
    /// Uses `alter` for atomic modify-and-cleanup operations to avoid TOCTOU race conditions.
    pub async fn remove_connection(&self, session_id: &str) -> Option<Arc<Connection>> {
        let (_, connection) = self.connections.remove(session_id)?;

        for topic in connection.topics().await {
            self.topic_connections.alter(&topic, |_, mut sessions| {
                sessions.remove(session_id);
                sessions
            });
        }

        self.topic_connections.retain(|_, sessions| !sessions.is_empty());

        tracing::debug!(session_id = %session_id, "Connection removed");

        Some(connection)
    }

    /// Get a connection by session ID
    pub fn get_connection(&self, session_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(session_id).map(|r| r.clone())
    }

    /// Subscribe a connection to a topic
    pub async fn subscribe(&self, session_id: &str, topic: Topic) -> bool {
        let Some(connection) = self.get_connection(session_id) else {
            return false;
        };

        connection.subscribe(topic).await;
        self.topic_connections
            .entry(topic)
            .or_default()
            .insert(session_id.to_string());

        tracing::trace!(
            session_id = %session_id,
            topic = %topic,
            "Connection subscribed to topic"
        );

        true
    }

    /// Unsubscribe a connection from a topic
    pub async fn unsubscribe(&self, session_id: &str, topic: Topic) -> bool {
        let Some(connection) = self.get_connection(session_id) else {
            return false;
        };

        connection.unsubscribe(topic).await;

        self.topic_connections.alter(&topic, |_, mut sessions| {
            sessions.remove(session_id);
            sessions
        });
        self.topic_connections.retain(|_, sessions| !sessions.is_empty());

        tracing::trace!(
            session_id = %session_id,
            topic = %topic,
            "Connection unsubscribed from topic"
        );

        true
    }

    /// Get all connections subscribed to a topic
    pub fn subscribers(&self, topic: Topic) -> Vec<Arc<Connection>> {
        // Collect ids first so no shard lock is held while reading `connections`
        let sessions: Vec<String> = self
            .topic_connections
            .get(&topic)
            .map(|sessions| sessions.iter().cloned().collect())
            .unwrap_or_default();

        sessions
            .iter()
            .filter_map(|sid| self.get_connection(sid))
            .collect()
    }

    /// Get the number of connections subscribed to a topic
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.topic_connections
            .get(&topic)
            .map_or(0, |sessions| sessions.len())
    }

    /// Get the total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Check if a session exists
    pub fn has_session(&self, session_id: &str) -> bool {
        self.connections.contains_key(session_id)
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .field("topics", &self.topic_connections.len())
            .finish()
    }
}
