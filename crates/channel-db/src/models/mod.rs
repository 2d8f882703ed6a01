//! Database models - SQLx-compatible structs for PostgreSQL tables

mod channel;
mod subscriber;

pub use channel::{ChannelModel, SubscriptionLinkModel};
pub use subscriber::SubscriberModel;
