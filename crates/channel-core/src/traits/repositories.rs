//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation (PostgreSQL or in-memory).

use async_trait::async_trait;

use crate::entities::{Channel, Subscriber, SubscriptionLink};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Channel Repository
// ============================================================================

#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Find channel by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>>;

    /// Find channel by its unique name
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Channel>>;

    /// Insert a channel whose `id` has already been assigned
    async fn create(&self, channel: &Channel) -> RepoResult<()>;

    /// Update an existing channel's metadata
    async fn update(&self, channel: &Channel) -> RepoResult<()>;

    /// Delete a channel. Links are not removed implicitly.
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Subscriber Repository
// ============================================================================

#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// Find subscriber by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Subscriber>>;

    /// Insert a subscriber whose `id` has already been assigned
    async fn create(&self, subscriber: &Subscriber) -> RepoResult<()>;

    /// Delete a subscriber
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Subscription Link Repository
// ============================================================================

#[async_trait]
pub trait SubscriptionLinkRepository: Send + Sync {
    /// Find the link for a channel/subscriber pair
    async fn find(
        &self,
        channel_id: Snowflake,
        subscriber_id: Snowflake,
    ) -> RepoResult<Option<SubscriptionLink>>;

    /// Create a link row.
    ///
    /// A row that already exists for the pair is left untouched and counts
    /// as success, so concurrent subscribes of the same pair both succeed.
    async fn create_link(&self, link: &SubscriptionLink) -> RepoResult<()>;

    /// Delete the link row for a pair
    async fn delete(&self, channel_id: Snowflake, subscriber_id: Snowflake) -> RepoResult<()>;

    /// Resolve every subscriber linked to a channel, in link creation order
    async fn find_subscribers(&self, channel_id: Snowflake) -> RepoResult<Vec<Subscriber>>;

    /// Number of links for a channel
    async fn count_by_channel(&self, channel_id: Snowflake) -> RepoResult<i64>;
}
