//! Point-in-time copy of the online set

use serde::{Deserialize, Serialize};

/// Immutable copy of the online usernames, sorted.
///
/// Serializes as a plain JSON array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OnlineSnapshot(Vec<String>);

impl OnlineSnapshot {
    /// Build a snapshot from any set of names; the result is sorted and deduplicated
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let mut names: Vec<String> = names.into_iter().collect();
        names.sort_unstable();
        names.dedup();
        Self(names)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.0.binary_search_by(|name| name.as_str().cmp(username)).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
