//! Message service
//!
//! Persists chat messages and relays the stored copy to subscribers.

use chat_core::entities::{ChatMessage, NewChatMessage};
use chat_core::Topic;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Save a message, then broadcast the saved copy on the messages topic.
    ///
    /// If the store fails the error is returned and nothing is published.
    #[instrument(skip(self, message), fields(sender = %message.sender))]
    pub async fn send_message(&self, message: NewChatMessage) -> ServiceResult<ChatMessage> {
        let saved = match self.ctx.message_store().save(message).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!(error = %e, "Failed to store message");
                return Err(e.into());
            }
        };

        info!(message_id = saved.id, preview = %saved.preview(32), "Message stored");
        self.ctx.publish(Topic::Messages, &saved).await;

        Ok(saved)
    }
}
