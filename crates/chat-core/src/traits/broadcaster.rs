//! Topic broadcaster port

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BroadcastResult;
use crate::value_objects::Topic;

/// Delivers a payload to every current subscriber of a topic.
///
/// Delivery is best-effort and at-most-once.
#[async_trait]
pub trait TopicBroadcaster: Send + Sync {
    /// Publish `payload` on `topic`, returning how many subscribers it was handed to
    async fn publish(&self, topic: Topic, payload: Value) -> BroadcastResult<usize>;
}
