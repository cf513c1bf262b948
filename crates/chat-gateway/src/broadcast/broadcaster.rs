//! Gateway broadcaster
//!
//! Delivers topic publishes to subscribed WebSocket connections.

use crate::connection::ConnectionManager;
use crate::protocol::GatewayMessage;
use async_trait::async_trait;
use chat_core::{BroadcastError, BroadcastResult, Topic, TopicBroadcaster};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;

/// Topic broadcaster backed by the connection manager
///
/// Each subscriber gets a Dispatch frame stamped with its own sequence
/// number. Frames are queued with `try_send`, so a subscriber whose
/// outbound queue is full or closed misses the frame instead of stalling
/// the publisher.
pub struct GatewayBroadcaster {
    /// Connection manager used to resolve subscribers
    connection_manager: Arc<ConnectionManager>,
    /// Set once the gateway starts shutting down
    closed: AtomicBool,
}

impl GatewayBroadcaster {
    /// Create a new broadcaster
    pub fn new(connection_manager: Arc<ConnectionManager>) -> Self {
        Self {
            connection_manager,
            closed: AtomicBool::new(false),
        }
    }

    /// Stop accepting publishes
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::info!("Gateway broadcaster closed");
        }
    }

    /// Check if the broadcaster has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TopicBroadcaster for GatewayBroadcaster {
    async fn publish(&self, topic: Topic, payload: Value) -> BroadcastResult<usize> {
        if self.is_closed() {
            return Err(BroadcastError::ChannelClosed);
        }

        let subscribers = self.connection_manager.subscribers(topic);
        let mut sent = 0;

        for conn in subscribers {
            let message = GatewayMessage::dispatch(topic, conn.next_sequence(), payload.clone());

            match conn.try_send(message) {
                Ok(()) => sent += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        session_id = %conn.session_id(),
                        topic = %topic,
                        "Outbound queue full, dropping frame"
                    );
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(
                        session_id = %conn.session_id(),
                        topic = %topic,
                        "Connection closed, skipping frame"
                    );
                }
            }
        }

        tracing::trace!(topic = %topic, sent = sent, "Topic published");

        Ok(sent)
    }
}

impl std::fmt::Debug for GatewayBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayBroadcaster")
            .field("closed", &self.is_closed())
            .finish()
    }
}
