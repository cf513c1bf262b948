//! Service context - dependency container for services
//!
//! Holds the presence registry, the message store, the topic broadcaster,
//! and the gate that orders presence publishes.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use chat_core::traits::{MessageStore, TopicBroadcaster};
use chat_core::Topic;

use super::error::{ServiceError, ServiceResult};
use crate::presence::PresenceRegistry;

/// Service context containing all dependencies
///
/// Cheap to clone; every clone shares the same registry and presence gate.
#[derive(Clone)]
pub struct ServiceContext {
    registry: Arc<PresenceRegistry>,
    message_store: Arc<dyn MessageStore>,
    broadcaster: Arc<dyn TopicBroadcaster>,
    presence_gate: Arc<Mutex<()>>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        registry: Arc<PresenceRegistry>,
        message_store: Arc<dyn MessageStore>,
        broadcaster: Arc<dyn TopicBroadcaster>,
    ) -> Self {
        Self {
            registry,
            message_store,
            broadcaster,
            presence_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Get the presence registry
    pub fn registry(&self) -> &PresenceRegistry {
        self.registry.as_ref()
    }

    /// Get the message store
    pub fn message_store(&self) -> &dyn MessageStore {
        self.message_store.as_ref()
    }

    /// Get the topic broadcaster
    pub fn broadcaster(&self) -> &dyn TopicBroadcaster {
        self.broadcaster.as_ref()
    }

    /// Serializes presence mutations with the publish that follows them.
    ///
    /// Held across "mutate, snapshot, publish" so the last online list sent
    /// always matches the registry.
    pub(crate) async fn lock_presence(&self) -> MutexGuard<'_, ()> {
        self.presence_gate.lock().await
    }

    /// Publish a payload, logging rather than returning failures
    pub(crate) async fn publish<T>(&self, topic: Topic, payload: &T)
    where
        T: Serialize + ?Sized,
    {
        let value = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(e) => {
                warn!(%topic, error = %e, "Failed to serialize payload");
                return;
            }
        };

        match self.broadcaster.publish(topic, value).await {
            Ok(receivers) => debug!(%topic, receivers, "Published"),
            Err(e) => warn!(%topic, error = %e, "Publish failed"),
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("online", &self.registry.len())
            .field("message_store", &"dyn MessageStore")
            .field("broadcaster", &"dyn TopicBroadcaster")
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    registry: Option<Arc<PresenceRegistry>>,
    message_store: Option<Arc<dyn MessageStore>>,
    broadcaster: Option<Arc<dyn TopicBroadcaster>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an existing registry; a fresh one is created otherwise
    pub fn registry(mut self, registry: Arc<PresenceRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn message_store(mut self, store: Arc<dyn MessageStore>) -> Self {
        self.message_store = Some(store);
        self
    }

    pub fn broadcaster(mut self, broadcaster: Arc<dyn TopicBroadcaster>) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.registry.unwrap_or_default(),
            self.message_store
                .ok_or_else(|| ServiceError::validation("message_store is required"))?,
            self.broadcaster
                .ok_or_else(|| ServiceError::validation("broadcaster is required"))?,
        ))
    }
}
