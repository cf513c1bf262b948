//! # chat-core
//!
//! Domain layer for the group chat: the message entity, topics, presence
//! snapshots, and the two capabilities the core depends on (message storage
//! and topic broadcasting). This crate has zero dependencies on infrastructure
//! (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{ChatMessage, NewChatMessage};
pub use error::{BroadcastError, BroadcastResult, DomainError};
pub use traits::{MessageStore, RepoResult, TopicBroadcaster};
pub use value_objects::{is_blank_username, OnlineSnapshot, Topic, TopicParseError};
