//! Channel entity <-> model mapper

use channel_core::{
    AllowedRoles, Channel, DomainError, Snowflake, SourceOrigin, SubscribeOptions,
    SubscriptionLink,
};
use sqlx::types::Json;

use crate::models::{ChannelModel, SubscriptionLinkModel};

/// Convert the authentication flag to its stored integer
#[inline]
pub fn flag_to_i16(flag: bool) -> i16 {
    i16::from(flag)
}

fn parse_source(column: &str, value: i16) -> Result<SourceOrigin, DomainError> {
    SourceOrigin::try_from(value)
        .map_err(|e| DomainError::InternalError(format!("channels.{column}: {e}")))
}

/// Convert ChannelModel to Channel entity
impl TryFrom<ChannelModel> for Channel {
    type Error = DomainError;

    fn try_from(model: ChannelModel) -> Result<Self, Self::Error> {
        let subscriber_source = parse_source("subscriber_source", model.subscriber_source)?;
        let event_source = parse_source("event_source", model.event_source)?;
        let requires_authentication = model.requires_authentication();

        let mut channel = Channel::new(model.name)
            .with_sources(subscriber_source, event_source)
            .with_allowed_roles(AllowedRoles::from_stored(&model.allowed_roles))
            .requiring_authentication(requires_authentication);
        channel.mark_persisted(Snowflake::new(model.id), model.create_date);
        Ok(channel)
    }
}

/// Normalized channel values for database insertion and update
#[derive(Debug)]
pub struct ChannelRow<'a> {
    pub id: i64,
    pub name: &'a str,
    pub is_authentication_required: i16,
    pub allowed_roles: String,
    pub subscriber_source: i16,
    pub event_source: i16,
}

impl<'a> ChannelRow<'a> {
    /// Prepare a channel for writing. Fails if the channel has no ID yet.
    pub fn new(channel: &'a Channel) -> Result<Self, DomainError> {
        let id = channel
            .id
            .ok_or_else(|| DomainError::InternalError("channel has no id".to_string()))?;
        Ok(Self {
            id: id.into_inner(),
            name: &channel.name,
            is_authentication_required: flag_to_i16(channel.is_authentication_required),
            allowed_roles: channel.allowed_roles.to_stored(),
            subscriber_source: channel.subscriber_source.as_i16(),
            event_source: channel.event_source.as_i16(),
        })
    }
}

/// Convert SubscriptionLinkModel to SubscriptionLink entity
impl From<SubscriptionLinkModel> for SubscriptionLink {
    fn from(model: SubscriptionLinkModel) -> Self {
        let Json(options) = model.options;
        let options = match options {
            serde_json::Value::Object(map) => map,
            _ => SubscribeOptions::new(),
        };
        SubscriptionLink {
            channel_id: Snowflake::new(model.channel_id),
            subscriber_id: Snowflake::new(model.subscriber_id),
            options,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use channel_core::Record;
    use chrono::Utc;
    use serde_json::json;

    fn model() -> ChannelModel {
        ChannelModel {
            id: 42,
            name: "orders".to_string(),
            is_authentication_required: 1,
            allowed_roles: "admin, guest".to_string(),
            subscriber_source: 1,
            event_source: 3,
            create_date: Utc::now(),
        }
    }

    #[test]
    fn test_model_to_channel() {
        let channel = Channel::try_from(model()).unwrap();
        assert!(!channel.is_new_record());
        assert_eq!(channel.id, Some(Snowflake::new(42)));
        assert!(channel.is_authentication_required);
        assert_eq!(channel.allowed_roles.as_slice(), ["admin", "guest"]);
        assert_eq!(channel.event_source, SourceOrigin::Either);
        assert!(channel.cached_subscribers().is_none());
    }

    #[test]
    fn test_invalid_stored_source() {
        let bad = ChannelModel {
            event_source: 9,
            ..model()
        };
        let err = Channel::try_from(bad).unwrap_err();
        assert!(matches!(err, DomainError::InternalError(_)));
    }

    #[test]
    fn test_row_normalizes_values() {
        let channel = Channel::try_from(model()).unwrap();
        let row = ChannelRow::new(&channel).unwrap();
        assert_eq!(row.id, 42);
        assert_eq!(row.is_authentication_required, 1);
        assert_eq!(row.allowed_roles, "admin, guest");
        assert_eq!(row.subscriber_source, 1);
        assert_eq!(row.event_source, 3);

        assert!(ChannelRow::new(&Channel::new("fresh")).is_err());
    }

    #[test]
    fn test_link_options_must_be_object() {
        let link = SubscriptionLink::from(SubscriptionLinkModel {
            channel_id: 1,
            subscriber_id: 2,
            options: Json(json!(["not", "an", "object"])),
            created_at: Utc::now(),
        });
        assert!(link.options.is_empty());
        assert_eq!(link.key(), (Snowflake::new(1), Snowflake::new(2)));
    }
}
