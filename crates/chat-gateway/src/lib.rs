//! # chat-gateway
//!
//! WebSocket gateway for the group chat: clients join, leave, type and send
//! messages over one socket and receive topic publishes on it.

pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use server::{create_app, create_gateway_state, run, serve, GatewayState};
