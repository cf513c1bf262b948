//! Chat message entity <-> model mapper

use chat_core::entities::ChatMessage;

use crate::models::ChatMessageModel;

/// Convert ChatMessageModel to ChatMessage entity
impl From<ChatMessageModel> for ChatMessage {
    fn from(model: ChatMessageModel) -> Self {
        ChatMessage {
            id: model.id,
            sender: model.sender,
            content: model.content,
        }
    }
}
