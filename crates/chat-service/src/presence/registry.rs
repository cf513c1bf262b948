//! Presence registry - the set of usernames currently online
//!
//! Internally synchronized; any number of tasks may add, remove and
//! snapshot concurrently without external locking.

use dashmap::DashSet;

use chat_core::{is_blank_username, OnlineSnapshot};

/// Concurrent set of online usernames
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    online: DashSet<String>,
}

impl PresenceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a user online.
    ///
    /// Blank names are ignored. Returns `true` if the set changed.
    pub fn add(&self, username: &str) -> bool {
        if is_blank_username(username) {
            return false;
        }
        self.online.insert(username.to_string())
    }

    /// Mark a user offline. Returns `true` if the user was present.
    pub fn remove(&self, username: &str) -> bool {
        self.online.remove(username).is_some()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.online.contains(username)
    }

    pub fn len(&self) -> usize {
        self.online.len()
    }

    pub fn is_empty(&self) -> bool {
        self.online.is_empty()
    }

    /// Point-in-time copy of the online set
    pub fn snapshot(&self) -> OnlineSnapshot {
        OnlineSnapshot::new(self.online.iter().map(|name| name.key().clone()))
    }
}
