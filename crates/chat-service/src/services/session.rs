//! Session lifecycle
//!
//! Called by the transport when a connection ends.

use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::presence::PresenceService;

/// Session lifecycle service
pub struct SessionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SessionService<'a> {
    /// Create a new SessionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Handle a closed connection.
    ///
    /// With a username this behaves exactly like a leave. Without one
    /// (the connection never joined) nothing happens.
    #[instrument(skip(self))]
    pub async fn on_disconnect(&self, username: Option<&str>) {
        match username {
            Some(username) => PresenceService::new(self.ctx).depart(username).await,
            None => debug!("Anonymous connection closed"),
        }
    }
}
