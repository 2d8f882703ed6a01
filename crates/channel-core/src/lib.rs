//! # channel-core
//!
//! Domain layer for the channel registry: channels, subscribers, the links
//! between them, the channel rule table and the repository ports.
//! This crate has zero dependencies on infrastructure (database, runtime, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod validation;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Channel, SubscribeOptions, Subscriber, SubscriptionLink};
pub use error::DomainError;
pub use traits::{
    ChannelRepository, Record, RepoResult, SubscriberRepository, SubscriptionLinkRepository,
};
pub use validation::{ChannelAttributes, ChannelField, Rule, UniquenessContext, CHANNEL_RULES};
pub use value_objects::{
    normalize_roles, AllowedRoles, Snowflake, SnowflakeGenerator, SnowflakeParseError,
    SourceOrigin,
};
