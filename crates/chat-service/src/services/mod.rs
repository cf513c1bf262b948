//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of a call.

pub mod context;
pub mod error;
pub mod message;
pub mod presence;
pub mod session;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use message::MessageService;
pub use presence::PresenceService;
pub use session::SessionService;
