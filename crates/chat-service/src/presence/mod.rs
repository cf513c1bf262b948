//! Online presence tracking

mod registry;

pub use registry::PresenceRegistry;
