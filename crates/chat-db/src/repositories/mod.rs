//! Message store implementations
//!
//! Implementations of the `MessageStore` trait defined in chat-core.

mod error;
mod memory;
mod message;

pub use memory::{MemoryMessageStore, DEFAULT_RETAINED_MESSAGES};
pub use message::PgMessageStore;
