//! Subscription link - the membership row joining a channel and a subscriber

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::{Channel, Subscriber};
use crate::traits::Record;
use crate::value_objects::Snowflake;

/// Caller-supplied subscribe options (delivery preferences and the like).
/// Opaque to the channel; stored with the link.
pub type SubscribeOptions = Map<String, Value>;

/// Membership of one subscriber in one channel.
///
/// Identified by the `(channel_id, subscriber_id)` pair; at most one link
/// exists per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionLink {
    pub channel_id: Snowflake,
    pub subscriber_id: Snowflake,
    #[serde(default)]
    pub options: SubscribeOptions,
    pub created_at: DateTime<Utc>,
}

impl SubscriptionLink {
    /// Link two persisted records. Returns `None` if either one is unsaved.
    #[must_use]
    pub fn between(
        channel: &Channel,
        subscriber: &Subscriber,
        options: SubscribeOptions,
    ) -> Option<Self> {
        Some(Self {
            channel_id: channel.id()?,
            subscriber_id: subscriber.id()?,
            options,
            created_at: Utc::now(),
        })
    }

    /// The composite key of this link
    #[inline]
    pub fn key(&self) -> (Snowflake, Snowflake) {
        (self.channel_id, self.subscriber_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_between_requires_persisted_records() {
        let mut channel = Channel::new("orders");
        let subscriber = Subscriber::with_id(Snowflake::new(2));
        let options = SubscribeOptions::new();
        assert!(SubscriptionLink::between(&channel, &subscriber, options).is_none());

        channel.id = Some(Snowflake::new(1));
        let unsaved = Subscriber::new(None);
        assert!(SubscriptionLink::between(&channel, &unsaved, SubscribeOptions::new()).is_none());

        let mut options = SubscribeOptions::new();
        options.insert("delivery".to_string(), json!("batched"));
        let link = SubscriptionLink::between(&channel, &subscriber, options).unwrap();
        assert_eq!(link.key(), (Snowflake::new(1), Snowflake::new(2)));
        assert_eq!(link.options["delivery"], "batched");
    }
}
