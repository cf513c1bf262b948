//! Gateway state
//!
//! Application state for the gateway server.

use crate::broadcast::GatewayBroadcaster;
use crate::connection::ConnectionManager;
use chat_common::{AppConfig, AppError};
use chat_core::MessageStore;
use chat_service::{ServiceContext, ServiceContextBuilder};
use std::sync::Arc;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Service context with the registry, store and broadcaster
    service_context: Arc<ServiceContext>,
    /// Connection manager for WebSocket connections
    connection_manager: Arc<ConnectionManager>,
    /// Topic broadcaster fanning publishes out to connections
    broadcaster: Arc<GatewayBroadcaster>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(
        service_context: ServiceContext,
        connection_manager: Arc<ConnectionManager>,
        broadcaster: Arc<GatewayBroadcaster>,
        config: AppConfig,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            connection_manager,
            broadcaster,
            config: Arc::new(config),
        }
    }

    /// Wire a gateway around `store`
    pub fn with_store(config: AppConfig, store: Arc<dyn MessageStore>) -> Result<Self, AppError> {
        let connection_manager = ConnectionManager::new_shared();
        let broadcaster = Arc::new(GatewayBroadcaster::new(connection_manager.clone()));

        let service_context = ServiceContextBuilder::new()
            .message_store(store)
            .broadcaster(broadcaster.clone())
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self::new(service_context, connection_manager, broadcaster, config))
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the connection manager
    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    /// Get the topic broadcaster
    pub fn broadcaster(&self) -> &GatewayBroadcaster {
        &self.broadcaster
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("connection_manager", &self.connection_manager)
            .field("broadcaster", &self.broadcaster)
            .field("config", &"AppConfig")
            .finish()
    }
}
