//! Database models (rows as SQLx sees them)

mod message;

pub use message::ChatMessageModel;
