//! Payload definitions for gateway frames

use chat_core::Topic;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    /// Create a Hello payload with custom interval
    #[must_use]
    pub fn with_interval(heartbeat_interval: u64) -> Self {
        Self { heartbeat_interval }
    }
}

/// Payload for op 2/3 (Subscribe / Unsubscribe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicPayload {
    pub topic: Topic,
}

/// Extract the username carried by a Join, Leave or Typing frame.
///
/// Accepts `{"username": ...}`, a bare JSON string, or nothing at all
/// (absent data, `null`, or a missing/`null` field all mean "no username").
/// Returns `None` for any other shape.
pub fn username_from(data: Option<&Value>) -> Option<Option<String>> {
    match data {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(name)) => Some(Some(name.clone())),
        Some(Value::Object(fields)) => match fields.get("username") {
            None | Some(Value::Null) => Some(None),
            Some(Value::String(name)) => Some(Some(name.clone())),
            Some(_) => None,
        },
        Some(_) => None,
    }
}
