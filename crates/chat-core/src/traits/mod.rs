//! Capability traits (ports) the presence and broadcast core depends on

mod broadcaster;
mod store;

pub use broadcaster::TopicBroadcaster;
pub use store::{MessageStore, RepoResult};
