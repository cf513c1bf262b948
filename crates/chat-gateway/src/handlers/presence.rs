//! Join / Leave / Typing handler (op 4, op 5, op 6)

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::CloseCode;
use crate::server::GatewayState;
use chat_core::is_blank_username;
use chat_service::PresenceService;
use std::sync::Arc;

/// Handles presence signals
pub struct PresenceHandler;

impl PresenceHandler {
    /// Handle a Join
    ///
    /// A usable name is bound to the connection before the registry sees it,
    /// so a disconnect at any point afterwards removes it again. The latest
    /// join on a connection wins.
    pub async fn join(
        state: &GatewayState,
        connection: &Arc<Connection>,
        username: Option<String>,
    ) -> HandlerResult<Option<CloseCode>> {
        if let Some(name) = username.as_deref().filter(|name| !is_blank_username(name)) {
            connection.set_username(name.to_string()).await;
        }

        PresenceService::new(state.service_context())
            .join(username.as_deref())
            .await;

        Ok(None)
    }

    /// Handle a Leave
    pub async fn leave(
        state: &GatewayState,
        connection: &Arc<Connection>,
        username: Option<String>,
    ) -> HandlerResult<Option<CloseCode>> {
        PresenceService::new(state.service_context())
            .leave(username.as_deref())
            .await;

        if let Some(name) = &username {
            connection.clear_username_if(name).await;
        }

        Ok(None)
    }

    /// Handle a Typing indicator
    pub async fn typing(
        state: &GatewayState,
        connection: &Arc<Connection>,
        username: Option<String>,
    ) -> HandlerResult<Option<CloseCode>> {
        tracing::trace!(session_id = %connection.session_id(), "Typing");

        PresenceService::new(state.service_context())
            .typing(username.as_deref())
            .await;

        Ok(None)
    }
}
