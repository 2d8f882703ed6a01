//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in channel-core.
//! Each repository handles database operations for a specific domain entity.

mod channel;
mod error;
mod subscriber;
mod subscription;

pub use channel::PgChannelRepository;
pub use subscriber::PgSubscriberRepository;
pub use subscription::PgSubscriptionLinkRepository;
