//! Domain errors

mod broadcast_error;
mod domain_error;

pub use broadcast_error::{BroadcastError, BroadcastResult};
pub use domain_error::DomainError;
