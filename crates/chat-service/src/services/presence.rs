//! Presence service
//!
//! Joins, leaves and typing signals. Every change to the online set is
//! followed by a publish of the whole set on the online topic.

use chat_core::{is_blank_username, OnlineSnapshot, Topic};
use tracing::{debug, info, instrument};

use super::context::ServiceContext;

/// Presence service
pub struct PresenceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PresenceService<'a> {
    /// Create a new PresenceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Current online set
    pub fn online(&self) -> OnlineSnapshot {
        self.ctx.registry().snapshot()
    }

    /// Mark a user online and announce the new online set.
    ///
    /// Missing or blank names are ignored entirely: no mutation, no publish.
    #[instrument(skip(self))]
    pub async fn join(&self, username: Option<&str>) {
        let Some(username) = username.filter(|name| !is_blank_username(name)) else {
            debug!("Ignoring join without a usable username");
            return;
        };

        let _gate = self.ctx.lock_presence().await;
        let added = self.ctx.registry().add(username);
        info!(username, added, "User joined");
        self.publish_online().await;
    }

    /// Mark a user offline and announce the online set.
    ///
    /// Unlike [`join`](Self::join) there is no blank check: the removal is
    /// attempted as given and the online set is published even if nothing changed.
    #[instrument(skip(self))]
    pub async fn leave(&self, username: Option<&str>) {
        let _gate = self.ctx.lock_presence().await;
        if let Some(username) = username {
            let removed = self.ctx.registry().remove(username);
            info!(username, removed, "User left");
        }
        self.publish_online().await;
    }

    /// Relay a typing indicator verbatim, absent or blank values included
    #[instrument(skip(self))]
    pub async fn typing(&self, username: Option<&str>) {
        self.ctx.publish(Topic::Typing, &username).await;
    }

    /// Remove a user whose connection went away and announce the online set
    pub(crate) async fn depart(&self, username: &str) {
        let _gate = self.ctx.lock_presence().await;
        let removed = self.ctx.registry().remove(username);
        info!(username, removed, "User disconnected");
        self.publish_online().await;
    }

    // Callers must hold the presence gate.
    async fn publish_online(&self) {
        let snapshot = self.ctx.registry().snapshot();
        self.ctx.publish(Topic::Online, &snapshot).await;
    }
}
