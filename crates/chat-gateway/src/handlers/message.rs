//! Send Message handler (op 7)

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::{CloseCode, GatewayMessage};
use crate::server::GatewayState;
use chat_common::{AppError, ErrorResponse};
use chat_core::NewChatMessage;
use chat_service::MessageService;
use std::sync::Arc;

/// Handles chat messages sent by clients
pub struct MessageHandler;

impl MessageHandler {
    /// Save and relay a message
    ///
    /// A store failure is reported back to the sender as an Error frame and
    /// the connection stays open.
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: NewChatMessage,
    ) -> HandlerResult<Option<CloseCode>> {
        match MessageService::new(state.service_context())
            .send_message(message)
            .await
        {
            Ok(saved) => {
                tracing::debug!(
                    session_id = %connection.session_id(),
                    message_id = saved.id,
                    "Message relayed"
                );
            }
            Err(e) => {
                let response = ErrorResponse::from(AppError::from(e));
                tracing::debug!(
                    session_id = %connection.session_id(),
                    code = %response.code,
                    "Message rejected"
                );

                if connection.send(GatewayMessage::error(&response)).await.is_err() {
                    tracing::debug!(
                        session_id = %connection.session_id(),
                        "Connection closed before error frame was sent"
                    );
                }
            }
        }

        Ok(None)
    }
}
