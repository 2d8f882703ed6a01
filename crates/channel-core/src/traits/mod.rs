//! Traits (ports) implemented by entities and the infrastructure layer

mod record;
mod repositories;

pub use record::Record;
pub use repositories::{
    ChannelRepository, RepoResult, SubscriberRepository, SubscriptionLinkRepository,
};
