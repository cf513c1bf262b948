//! Error handling utilities for repositories

use chat_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
///
/// Pool exhaustion and shutdown surface as `StoreUnavailable`; everything
/// else is a `DatabaseError`.
pub fn map_db_error(e: SqlxError) -> DomainError {
    match e {
        SqlxError::PoolTimedOut | SqlxError::PoolClosed => {
            DomainError::StoreUnavailable(e.to_string())
        }
        other => DomainError::DatabaseError(other.to_string()),
    }
}
