//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use channel_core::{Channel, Snowflake, Subscriber};

use super::responses::{ChannelResponse, ChannelSubscribersResponse, SubscriberResponse};

fn id_string(id: Option<Snowflake>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

impl From<&Channel> for ChannelResponse {
    fn from(channel: &Channel) -> Self {
        Self {
            id: id_string(channel.id),
            name: channel.name.clone(),
            is_authentication_required: i16::from(channel.is_authentication_required),
            allowed_roles: channel.allowed_roles.to_stored(),
            subscriber_source: channel.subscriber_source.as_i16(),
            event_source: channel.event_source.as_i16(),
            create_date: channel.create_date,
        }
    }
}

impl From<Channel> for ChannelResponse {
    fn from(channel: Channel) -> Self {
        Self::from(&channel)
    }
}

impl From<&Subscriber> for SubscriberResponse {
    fn from(subscriber: &Subscriber) -> Self {
        Self {
            id: id_string(subscriber.id),
            user_id: subscriber.user_id.clone(),
            created_at: subscriber.created_at,
        }
    }
}

impl From<Subscriber> for SubscriberResponse {
    fn from(subscriber: Subscriber) -> Self {
        Self::from(&subscriber)
    }
}

impl ChannelSubscribersResponse {
    pub fn new(channel: &Channel, subscribers: &[Subscriber]) -> Self {
        Self {
            channel_id: id_string(channel.id),
            subscribers: subscribers.iter().map(SubscriberResponse::from).collect(),
        }
    }
}
