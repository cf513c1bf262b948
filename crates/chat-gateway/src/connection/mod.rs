//! Connection management
//!
//! Tracks open WebSocket connections and their topic subscriptions.

mod connection;
mod manager;

pub use connection::{Connection, ConnectionState};
pub use manager::ConnectionManager;
