//! Topic broadcasting
//!
//! Fans published payloads out to the WebSocket connections subscribed to a topic.

mod broadcaster;

pub use broadcaster::GatewayBroadcaster;
