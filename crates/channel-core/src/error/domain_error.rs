//! Domain errors - error types for the domain layer

use thiserror::Error;
use validator::ValidationErrors;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    #[error("Subscriber not found: {0}")]
    SubscriberNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Channel name already in use: {0}")]
    ChannelNameTaken(String),

    #[error("Channel still has subscribers")]
    ChannelHasSubscribers,

    #[error("Subscriber is still linked to channels")]
    SubscriberHasLinks,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::SubscriberNotFound(_) => "UNKNOWN_SUBSCRIBER",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::ChannelNameTaken(_) => "CHANNEL_NAME_TAKEN",
            Self::ChannelHasSubscribers => "CHANNEL_HAS_SUBSCRIBERS",
            Self::SubscriberHasLinks => "SUBSCRIBER_HAS_LINKS",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ChannelNotFound(_) | Self::SubscriberNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::ChannelNameTaken(_) | Self::ChannelHasSubscribers | Self::SubscriberHasLinks
        )
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
