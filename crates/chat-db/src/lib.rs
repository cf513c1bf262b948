//! # chat-db
//!
//! Storage layer implementing the `MessageStore` trait from `chat-core`.
//!
//! ## Overview
//!
//! - Connection pool management
//! - Schema bootstrap for the `chat_messages` table
//! - Database models with SQLx `FromRow` derives and their mappers
//! - [`PgMessageStore`] backed by PostgreSQL
//! - [`MemoryMessageStore`] for single-node runs without a database
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chat_db::{create_pool, ensure_schema, DatabaseConfig, PgMessageStore};
//! use chat_core::{MessageStore, NewChatMessage};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     ensure_schema(&pool).await?;
//!     let store = PgMessageStore::new(pool);
//!
//!     let saved = store.save(NewChatMessage::new("alice", "hi")).await?;
//!     println!("stored as {}", saved.id);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use pool::{create_pool, DatabaseConfig, PgPool};
pub use repositories::{MemoryMessageStore, PgMessageStore, DEFAULT_RETAINED_MESSAGES};
pub use schema::ensure_schema;
