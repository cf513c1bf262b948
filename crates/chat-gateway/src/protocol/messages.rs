//! Gateway message format
//!
//! Defines the structure for all WebSocket messages.

use super::{username_from, CloseCode, HelloPayload, OpCode, TopicPayload};
use chat_common::ErrorResponse;
use chat_core::{NewChatMessage, Topic};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gateway message format
///
/// All messages sent over the WebSocket connection follow this format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Topic name (only for op=0 Dispatch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Per-connection sequence number (only for op=0 Dispatch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Data payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

impl GatewayMessage {
    fn bare(op: OpCode, d: Option<Value>) -> Self {
        Self {
            op,
            t: None,
            s: None,
            d,
        }
    }

    // === Server Messages ===

    /// Create a Dispatch message (op=0) for a topic publish
    #[must_use]
    pub fn dispatch(topic: Topic, sequence: u64, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            t: Some(topic.name().to_string()),
            s: Some(sequence),
            d: Some(data),
        }
    }

    /// Create a Hello message (op=10)
    #[must_use]
    pub fn hello(payload: HelloPayload) -> Self {
        Self::bare(OpCode::Hello, serde_json::to_value(payload).ok())
    }

    /// Create a Heartbeat ACK message (op=11)
    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self::bare(OpCode::HeartbeatAck, None)
    }

    /// Create an Error message (op=8)
    #[must_use]
    pub fn error(response: &ErrorResponse) -> Self {
        Self::bare(OpCode::Error, serde_json::to_value(response).ok())
    }

    // === Parsing Client Messages ===

    /// Try to parse the heartbeat sequence number (op=1)
    pub fn as_heartbeat_seq(&self) -> Option<Option<u64>> {
        if self.op != OpCode::Heartbeat {
            return None;
        }
        Some(self.d.as_ref().and_then(Value::as_u64))
    }

    /// Try to parse a Subscribe/Unsubscribe topic (op=2, op=3)
    pub fn as_topic(&self) -> Option<Topic> {
        if !matches!(self.op, OpCode::Subscribe | OpCode::Unsubscribe) {
            return None;
        }
        self.d
            .as_ref()
            .and_then(|d| serde_json::from_value::<TopicPayload>(d.clone()).ok())
            .map(|payload| payload.topic)
    }

    /// Try to parse the username of a Join/Leave/Typing frame (op=4..6)
    ///
    /// The outer `Option` is `None` when the payload is malformed; the inner
    /// one is `None` when the client sent no username.
    pub fn as_username(&self) -> Option<Option<String>> {
        if !matches!(self.op, OpCode::Join | OpCode::Leave | OpCode::Typing) {
            return None;
        }
        username_from(self.d.as_ref())
    }

    /// Try to parse a SendMessage payload (op=7)
    pub fn as_new_message(&self) -> Option<NewChatMessage> {
        if self.op != OpCode::SendMessage {
            return None;
        }
        self.d.as_ref().and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    // === Utilities ===

    /// Check if this is a valid client message
    #[must_use]
    pub fn is_valid_client_message(&self) -> bool {
        self.op.is_client_op()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Code and reason for a WebSocket close frame
    #[must_use]
    pub fn close_frame(code: CloseCode) -> (u16, &'static str) {
        (code.as_u16(), code.description())
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "GatewayMessage(op={}, t={}", self.op, t)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "GatewayMessage(op={})", self.op)
        }
    }
}
