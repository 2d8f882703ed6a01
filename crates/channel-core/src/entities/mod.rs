//! Domain entities - core business objects

mod channel;
mod subscriber;
mod subscription;

pub use channel::Channel;
pub use subscriber::Subscriber;
pub use subscription::{SubscribeOptions, SubscriptionLink};
