//! Value objects - immutable types that represent domain concepts

mod snapshot;
mod topic;
mod username;

pub use snapshot::OnlineSnapshot;
pub use topic::{Topic, TopicParseError};
pub use username::is_blank_username;
