//! Subscribe / Unsubscribe handler (op 2, op 3)

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::CloseCode;
use crate::server::GatewayState;
use chat_core::Topic;
use std::sync::Arc;

/// Handles topic subscription changes
pub struct SubscriptionHandler;

impl SubscriptionHandler {
    /// Start delivering `topic` to this connection
    pub async fn subscribe(
        state: &GatewayState,
        connection: &Arc<Connection>,
        topic: Topic,
    ) -> HandlerResult<Option<CloseCode>> {
        state
            .connection_manager()
            .subscribe(connection.session_id(), topic)
            .await;

        tracing::debug!(
            session_id = %connection.session_id(),
            topic = %topic,
            "Subscribed"
        );

        Ok(None)
    }

    /// Stop delivering `topic` to this connection
    pub async fn unsubscribe(
        state: &GatewayState,
        connection: &Arc<Connection>,
        topic: Topic,
    ) -> HandlerResult<Option<CloseCode>> {
        state
            .connection_manager()
            .unsubscribe(connection.session_id(), topic)
            .await;

        tracing::debug!(
            session_id = %connection.session_id(),
            topic = %topic,
            "Unsubscribed"
        );

        Ok(None)
    }
}
