//! Op code handlers
//!
//! Handles incoming WebSocket messages based on their operation code.

mod error;
mod heartbeat;
mod message;
mod presence;
mod subscription;

pub use error::{HandlerError, HandlerResult};
pub use heartbeat::HeartbeatHandler;
pub use message::MessageHandler;
pub use presence::PresenceHandler;
pub use subscription::SubscriptionHandler;

use crate::connection::Connection;
use crate::protocol::{CloseCode, GatewayMessage, OpCode};
use crate::server::GatewayState;
use std::sync::Arc;

/// Dispatch incoming client messages to appropriate handlers
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle an incoming client message
    pub async fn dispatch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: GatewayMessage,
    ) -> HandlerResult<Option<CloseCode>> {
        // Validate that this is a client-sendable op code
        if !message.is_valid_client_message() {
            tracing::warn!(
                session_id = %connection.session_id(),
                op = %message.op,
                "Received server-only op code from client"
            );
            return Ok(Some(CloseCode::UnknownOpcode));
        }

        match message.op {
            OpCode::Heartbeat => {
                let seq = message.as_heartbeat_seq().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Heartbeat payload".to_string())
                })?;

                HeartbeatHandler::handle(connection, seq).await
            }
            OpCode::Subscribe => {
                let topic = message.as_topic().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Subscribe payload".to_string())
                })?;

                SubscriptionHandler::subscribe(state, connection, topic).await
            }
            OpCode::Unsubscribe => {
                let topic = message.as_topic().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Unsubscribe payload".to_string())
                })?;

                SubscriptionHandler::unsubscribe(state, connection, topic).await
            }
            OpCode::Join => {
                let username = message.as_username().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Join payload".to_string())
                })?;

                PresenceHandler::join(state, connection, username).await
            }
            OpCode::Leave => {
                let username = message.as_username().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Leave payload".to_string())
                })?;

                PresenceHandler::leave(state, connection, username).await
            }
            OpCode::Typing => {
                let username = message.as_username().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Typing payload".to_string())
                })?;

                PresenceHandler::typing(state, connection, username).await
            }
            OpCode::SendMessage => {
                let new_message = message.as_new_message().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid SendMessage payload".to_string())
                })?;

                MessageHandler::handle(state, connection, new_message).await
            }
            // These ops should never reach here due to is_client_op check
            _ => {
                tracing::error!(op = %message.op, "Unhandled client op code");
                Ok(Some(CloseCode::UnknownOpcode))
            }
        }
    }
}
