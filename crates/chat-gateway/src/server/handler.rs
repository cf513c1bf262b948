//! WebSocket handler
//!
//! Handles WebSocket connections and message processing.

use crate::connection::{Connection, ConnectionState};
use crate::handlers::MessageDispatcher;
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use chat_service::SessionService;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// How long the send task may take to flush a close frame
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let session_id = uuid::Uuid::new_v4().to_string();
    let gateway_config = state.config().gateway.clone();

    // Create message channel for outgoing messages
    let (tx, mut rx) = mpsc::channel::<GatewayMessage>(gateway_config.outbound_buffer);
    // Close requests from the receive and heartbeat tasks; `None` closes
    // without a code after the peer went away
    let (close_tx, mut close_rx) = mpsc::channel::<Option<CloseCode>>(1);

    // Register connection
    let connection = state
        .connection_manager()
        .add_connection(session_id.clone(), tx);

    tracing::info!(session_id = %session_id, "WebSocket connection established");

    // Split the WebSocket
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Send Hello message immediately
    let interval_ms = u64::try_from(gateway_config.heartbeat_interval.as_millis()).unwrap_or(u64::MAX);
    let hello = GatewayMessage::hello(HelloPayload::with_interval(interval_ms));
    if let Ok(json) = hello.to_json() {
        if ws_sink.send(Message::Text(json)).await.is_err() {
            tracing::warn!(session_id = %session_id, "Failed to send Hello message");
            cleanup_connection(&state, &session_id, &connection).await;
            return;
        }
    }

    // Spawn task to receive messages from WebSocket
    let state_recv = state.clone();
    let session_id_recv = session_id.clone();
    let connection_recv = connection.clone();
    let close_recv = close_tx.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            let close_code = match msg {
                Ok(Message::Text(text)) => {
                    match handle_text_message(&state_recv, &connection_recv, &text).await {
                        Ok(()) => continue,
                        Err(code) => code,
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        session_id = %session_id_recv,
                        "Binary messages not supported"
                    );
                    CloseCode::DecodeError
                }
                Ok(Message::Ping(_)) => {
                    // Pong is handled automatically by axum
                    tracing::trace!(session_id = %session_id_recv, "Ping received");
                    continue;
                }
                Ok(Message::Pong(_)) => {
                    tracing::trace!(session_id = %session_id_recv, "Pong received");
                    continue;
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(session_id = %session_id_recv, "Client closed connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id_recv,
                        error = %e,
                        "WebSocket error"
                    );
                    break;
                }
            };

            tracing::debug!(
                session_id = %session_id_recv,
                close_code = %close_code,
                "Closing connection due to error"
            );
            let _ = close_recv.send(Some(close_code)).await;
            return;
        }

        let _ = close_recv.send(None).await;
    });

    // Spawn task to send messages to WebSocket
    let session_id_send = session_id.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(code) = close_rx.recv() => {
                    if let Some(code) = code {
                        let (code, reason) = GatewayMessage::close_frame(code);
                        let frame = CloseFrame {
                            code,
                            reason: reason.into(),
                        };
                        let _ = ws_sink.send(Message::Close(Some(frame))).await;
                    }
                    break;
                }
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    let json = match msg.to_json() {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!(
                                session_id = %session_id_send,
                                error = %e,
                                "Failed to serialize outgoing message"
                            );
                            continue;
                        }
                    };
                    if ws_sink.send(Message::Text(json)).await.is_err() {
                        tracing::warn!(
                            session_id = %session_id_send,
                            "Failed to send message to WebSocket"
                        );
                        break;
                    }
                }
            }
        }

        let _ = ws_sink.close().await;
    });

    // Spawn heartbeat monitoring task
    let session_id_hb = session_id.clone();
    let connection_hb = connection.clone();
    let close_hb = close_tx;
    let timeout = gateway_config.heartbeat_timeout;
    let mut heartbeat_task = tokio::spawn(async move {
        let mut check_interval = interval(gateway_config.heartbeat_interval / 2);

        loop {
            check_interval.tick().await;

            let time_since = connection_hb.time_since_heartbeat().await;
            if time_since > timeout {
                tracing::warn!(
                    session_id = %session_id_hb,
                    time_since_ms = time_since.as_millis(),
                    "Connection timed out (no heartbeat)"
                );
                let _ = close_hb.send(Some(CloseCode::SessionTimeout)).await;
                break;
            }
        }
    });

    // Wait for any task to complete
    tokio::select! {
        _ = &mut recv_task => {
            tracing::debug!(session_id = %session_id, "Receive task ended");
        }
        _ = &mut send_task => {
            tracing::debug!(session_id = %session_id, "Send task ended");
        }
        _ = &mut heartbeat_task => {
            tracing::debug!(session_id = %session_id, "Heartbeat task ended");
        }
    }

    // Give a pending close frame a chance to go out
    if !send_task.is_finished()
        && tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, &mut send_task).await.is_err()
    {
        send_task.abort();
    }
    recv_task.abort();
    heartbeat_task.abort();

    cleanup_connection(&state, &session_id, &connection).await;
}

/// Handle a text message from the client
async fn handle_text_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    text: &str,
) -> Result<(), CloseCode> {
    let message = match GatewayMessage::from_json(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(
                session_id = %connection.session_id(),
                error = %e,
                "Failed to parse message"
            );
            return Err(CloseCode::DecodeError);
        }
    };

    tracing::trace!(
        session_id = %connection.session_id(),
        op = %message.op,
        "Received message"
    );

    match MessageDispatcher::dispatch(state, connection, message).await {
        Ok(Some(close_code)) => Err(close_code),
        Ok(None) => Ok(()),
        Err(e) => {
            tracing::warn!(
                session_id = %connection.session_id(),
                error = %e,
                "Handler error"
            );
            Err(e.to_close_code())
        }
    }
}

/// Clean up a connection on disconnect
///
/// The connection leaves the manager before presence is updated, so the
/// final online publish is not queued for the socket that just went away.
pub(crate) async fn cleanup_connection(state: &GatewayState, session_id: &str, connection: &Arc<Connection>) {
    tracing::info!(session_id = %session_id, "Cleaning up connection");

    connection.set_state(ConnectionState::Closed).await;
    let username = connection.username().await;

    state.connection_manager().remove_connection(session_id).await;

    SessionService::new(state.service_context())
        .on_disconnect(username.as_deref())
        .await;
}
