//! Broadcast topics
//!
//! The chat has exactly three fan-out channels. Clients subscribe to them by
//! wire name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broadcast topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    /// Full list of online usernames
    Online,
    /// Username of whoever is typing
    Typing,
    /// Persisted chat messages
    Messages,
}

impl Topic {
    /// All topics, in a stable order
    pub const ALL: [Topic; 3] = [Topic::Online, Topic::Typing, Topic::Messages];

    /// Wire name of the topic
    pub const fn name(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Typing => "typing",
            Self::Messages => "messages",
        }
    }

    /// Parse a wire name
    pub fn parse(s: &str) -> Result<Self, TopicParseError> {
        Self::ALL
            .into_iter()
            .find(|topic| topic.name() == s)
            .ok_or_else(|| TopicParseError::Unknown(s.to_string()))
    }
}

/// Error when parsing a topic name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopicParseError {
    #[error("unknown topic: {0}")]
    Unknown(String),
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Topic {
    type Err = TopicParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::parse(s)
    }
}
