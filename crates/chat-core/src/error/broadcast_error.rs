use thiserror::Error;

/// Result type for topic publishes
pub type BroadcastResult<T> = Result<T, BroadcastError>;

/// Errors raised while fanning a payload out to a topic
#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("Failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Broadcast channel closed")]
    ChannelClosed,
}
