//! Error handling utilities for repositories

use channel_core::{DomainError, Snowflake};
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}

/// Check for foreign key violation and return appropriate error or fallback
pub fn map_foreign_key_violation<F>(e: SqlxError, on_violation: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return on_violation();
        }
    }
    map_db_error(e)
}

/// Create a "channel not found" error
pub fn channel_not_found(id: Snowflake) -> DomainError {
    DomainError::ChannelNotFound(id)
}

/// Create a "subscriber not found" error
pub fn subscriber_not_found(id: Snowflake) -> DomainError {
    DomainError::SubscriberNotFound(id)
}
