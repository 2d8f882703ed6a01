//! Channel entity - a named pub/sub topic with auth and provenance metadata

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::entities::Subscriber;
use crate::traits::Record;
use crate::validation::ChannelAttributes;
use crate::value_objects::{AllowedRoles, Snowflake, SourceOrigin};

/// Channel aggregate.
///
/// `subscribers` is a per-instance snapshot of the channel's members. It is
/// never persisted and is not shared between instances loaded separately.
#[derive(Debug, Clone)]
pub struct Channel {
    pub id: Option<Snowflake>,
    pub name: String,
    pub is_authentication_required: bool,
    pub allowed_roles: AllowedRoles,
    pub subscriber_source: SourceOrigin,
    pub event_source: SourceOrigin,
    pub create_date: Option<DateTime<Utc>>,
    subscribers: Option<Vec<Subscriber>>,
}

impl Channel {
    /// Persisted attributes, in storage column order
    pub const ATTRIBUTES: [&'static str; 7] = [
        "id",
        "name",
        "is_authentication_required",
        "allowed_roles",
        "subscriber_source",
        "event_source",
        "create_date",
    ];

    /// Create an unsaved channel with default metadata: no authentication,
    /// no role restriction, server-side subscribers and events.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            is_authentication_required: false,
            allowed_roles: AllowedRoles::default(),
            subscriber_source: SourceOrigin::Php,
            event_source: SourceOrigin::Php,
            create_date: None,
            subscribers: None,
        }
    }

    #[must_use]
    pub fn with_sources(
        mut self,
        subscriber_source: SourceOrigin,
        event_source: SourceOrigin,
    ) -> Self {
        self.subscriber_source = subscriber_source;
        self.event_source = event_source;
        self
    }

    #[must_use]
    pub fn with_allowed_roles(mut self, roles: AllowedRoles) -> Self {
        self.allowed_roles = roles;
        self
    }

    #[must_use]
    pub fn requiring_authentication(mut self, required: bool) -> Self {
        self.is_authentication_required = required;
        self
    }

    /// Raw attribute view used by the channel rule table
    pub fn attributes(&self) -> ChannelAttributes {
        ChannelAttributes {
            name: Some(self.name.clone()),
            is_authentication_required: Some(Value::Bool(self.is_authentication_required)),
            allowed_roles: Some(self.allowed_roles.as_slice().to_vec()),
            subscriber_source: Some(Value::from(self.subscriber_source.as_i16())),
            event_source: Some(Value::from(self.event_source.as_i16())),
            create_date: self.create_date,
        }
    }

    /// Record the identity assigned by the first successful save
    pub fn mark_persisted(&mut self, id: Snowflake, create_date: DateTime<Utc>) {
        self.id = Some(id);
        self.create_date.get_or_insert(create_date);
    }

    // ------------------------------------------------------------------
    // Subscriber snapshot
    // ------------------------------------------------------------------

    /// The last resolved subscriber list, if one was loaded
    pub fn cached_subscribers(&self) -> Option<&[Subscriber]> {
        self.subscribers.as_deref()
    }

    /// Replace the snapshot and return it
    pub fn cache_subscribers(&mut self, subscribers: Vec<Subscriber>) -> &[Subscriber] {
        self.subscribers.insert(subscribers)
    }

    /// Remove the first cached subscriber with the given ID.
    /// Returns whether an entry was removed.
    pub fn evict_subscriber(&mut self, subscriber_id: Snowflake) -> bool {
        let Some(cached) = self.subscribers.as_mut() else {
            return false;
        };
        match cached.iter().position(|s| s.id == Some(subscriber_id)) {
            Some(index) => {
                cached.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop the snapshot so the next listing reloads from storage
    pub fn forget_subscribers(&mut self) {
        self.subscribers = None;
    }
}

impl Record for Channel {
    fn id(&self) -> Option<Snowflake> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscriber(id: i64) -> Subscriber {
        Subscriber::with_id(Snowflake::new(id))
    }

    #[test]
    fn test_new_channel_defaults() {
        let channel = Channel::new("orders");
        assert!(channel.is_new_record());
        assert!(!channel.is_authentication_required);
        assert!(channel.allowed_roles.is_empty());
        assert_eq!(channel.subscriber_source, SourceOrigin::Php);
        assert_eq!(channel.event_source, SourceOrigin::Php);
        assert!(channel.cached_subscribers().is_none());
    }

    #[test]
    fn test_attributes_view() {
        let channel = Channel::new("orders")
            .with_sources(SourceOrigin::Php, SourceOrigin::Either)
            .with_allowed_roles(AllowedRoles::new(["admin"]))
            .requiring_authentication(true);
        let attrs = channel.attributes();
        assert_eq!(attrs.name.as_deref(), Some("orders"));
        assert_eq!(attrs.is_authentication_required, Some(Value::Bool(true)));
        assert_eq!(attrs.subscriber_source, Some(Value::from(1)));
        assert_eq!(attrs.event_source, Some(Value::from(3)));
        assert_eq!(attrs.allowed_roles, Some(vec!["admin".to_string()]));
    }

    #[test]
    fn test_mark_persisted_keeps_existing_create_date() {
        let mut channel = Channel::new("orders");
        let original = Utc::now() - chrono::Duration::days(1);
        channel.create_date = Some(original);
        channel.mark_persisted(Snowflake::new(9), Utc::now());
        assert_eq!(channel.id, Some(Snowflake::new(9)));
        assert_eq!(channel.create_date, Some(original));
    }

    #[test]
    fn test_evict_first_match_only() {
        let mut channel = Channel::new("orders");
        assert!(!channel.evict_subscriber(Snowflake::new(1)));

        channel.cache_subscribers(vec![subscriber(1), subscriber(2), subscriber(1)]);
        assert!(channel.evict_subscriber(Snowflake::new(1)));

        let remaining: Vec<_> = channel
            .cached_subscribers()
            .unwrap()
            .iter()
            .filter_map(|s| s.id)
            .collect();
        assert_eq!(remaining, vec![Snowflake::new(2), Snowflake::new(1)]);
        assert!(!channel.evict_subscriber(Snowflake::new(3)));
    }

    #[test]
    fn test_forget_subscribers() {
        let mut channel = Channel::new("orders");
        channel.cache_subscribers(vec![subscriber(1)]);
        channel.forget_subscribers();
        assert!(channel.cached_subscribers().is_none());
    }
}
