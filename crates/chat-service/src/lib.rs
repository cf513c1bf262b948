//! # chat-service
//!
//! Application layer: the presence registry and the services that sit
//! between inbound chat signals and the topic broadcaster.

pub mod presence;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

pub use presence::PresenceRegistry;
pub use services::{
    MessageService, PresenceService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, SessionService,
};
