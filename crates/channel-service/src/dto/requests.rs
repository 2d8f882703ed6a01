//! Request DTOs
//!
//! Channel requests keep loosely typed fields as JSON values so that wrong
//! types surface as field-level validation errors rather than parse failures.

use channel_core::{AllowedRoles, Channel, ChannelAttributes};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

fn default_flag() -> Option<Value> {
    Some(Value::Bool(false))
}

fn default_source() -> Option<Value> {
    Some(Value::from(1))
}

/// Convert a raw roles value to tokens.
///
/// A sequence keeps one token per item; a string is split on its separator;
/// anything else means no roles.
fn roles_from_value(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) => AllowedRoles::from_stored(&s).as_slice().to_vec(),
        _ => Vec::new(),
    }
}

// ============================================================================
// Channel Requests
// ============================================================================

/// Create channel request
///
/// Omitted metadata takes the channel defaults; an explicit `null` leaves the
/// field blank and fails the required rule.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChannelRequest {
    pub name: Option<String>,

    #[serde(default = "default_flag")]
    pub is_authentication_required: Option<Value>,

    /// Sequence of role tokens or a `", "`-joined string
    #[serde(default)]
    pub allowed_roles: Option<Value>,

    #[serde(default = "default_source")]
    pub subscriber_source: Option<Value>,

    #[serde(default = "default_source")]
    pub event_source: Option<Value>,

    /// Accepted as-is; set on first save when absent
    #[serde(default)]
    pub create_date: Option<DateTime<Utc>>,
}

impl CreateChannelRequest {
    /// Request with only a name; every other field takes its default
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            is_authentication_required: default_flag(),
            allowed_roles: None,
            subscriber_source: default_source(),
            event_source: default_source(),
            create_date: None,
        }
    }

    #[must_use]
    pub fn with_sources(
        mut self,
        subscriber_source: impl Into<Value>,
        event_source: impl Into<Value>,
    ) -> Self {
        self.subscriber_source = Some(subscriber_source.into());
        self.event_source = Some(event_source.into());
        self
    }

    pub fn into_attributes(self) -> ChannelAttributes {
        ChannelAttributes {
            name: self.name,
            is_authentication_required: self.is_authentication_required,
            allowed_roles: self.allowed_roles.map(roles_from_value),
            subscriber_source: self.subscriber_source,
            event_source: self.event_source,
            create_date: self.create_date,
        }
    }
}

/// Update channel request; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateChannelRequest {
    pub name: Option<String>,
    pub is_authentication_required: Option<Value>,
    pub allowed_roles: Option<Value>,
    pub subscriber_source: Option<Value>,
    pub event_source: Option<Value>,
}

impl UpdateChannelRequest {
    /// Overlay the requested changes on a channel's current attributes
    pub fn apply_to(self, channel: &Channel) -> ChannelAttributes {
        let current = channel.attributes();
        ChannelAttributes {
            name: self.name.or(current.name),
            is_authentication_required: self
                .is_authentication_required
                .or(current.is_authentication_required),
            allowed_roles: self
                .allowed_roles
                .map(roles_from_value)
                .or(current.allowed_roles),
            subscriber_source: self.subscriber_source.or(current.subscriber_source),
            event_source: self.event_source.or(current.event_source),
            create_date: current.create_date,
        }
    }
}

// ============================================================================
// Subscriber Requests
// ============================================================================

/// Create subscriber request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateSubscriberRequest {
    #[validate(length(min = 1, max = 255, message = "User ID must be 1-255 characters"))]
    pub user_id: Option<String>,
}
