//! Channel validation
//!
//! Channel attributes are checked against a fixed rule table. Every failing
//! rule adds a field-level error; a single pass reports all of them.

mod rules;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::ValidationErrors;

use crate::entities::Channel;
use crate::value_objects::{AllowedRoles, Snowflake, SourceOrigin};

pub use rules::{coerce_flag, ChannelField, Rule, CHANNEL_RULES};

/// Raw, loosely typed channel attributes as received at the boundary.
///
/// `is_authentication_required` and the two sources stay as JSON values so
/// that wrong types become validation errors instead of parse failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelAttributes {
    pub name: Option<String>,
    pub is_authentication_required: Option<Value>,
    pub allowed_roles: Option<Vec<String>>,
    pub subscriber_source: Option<Value>,
    pub event_source: Option<Value>,
    pub create_date: Option<DateTime<Utc>>,
}

/// Facts about existing records the uniqueness rule needs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniquenessContext {
    /// ID of the record being validated (`None` for a new record)
    pub record_id: Option<Snowflake>,
    /// ID of the stored channel currently holding the name, if any
    pub name_owner: Option<Snowflake>,
}

impl ChannelAttributes {
    /// Run every rule in [`CHANNEL_RULES`] and collect the failures
    pub fn validate_with(&self, ctx: UniquenessContext) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (field, rule) in CHANNEL_RULES {
            if let Some(error) = rule.check(*field, self, ctx) {
                errors.add(field.as_str(), error);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate (without a name lookup) and build an unsaved channel
    pub fn into_channel(self) -> Result<Channel, ValidationErrors> {
        self.validate_with(UniquenessContext::default())?;

        let source = |value: &Option<Value>| {
            value
                .as_ref()
                .and_then(SourceOrigin::from_value)
                .unwrap_or_default()
        };

        let mut channel = Channel::new(self.name.clone().unwrap_or_default())
            .with_sources(source(&self.subscriber_source), source(&self.event_source))
            .with_allowed_roles(AllowedRoles::new(self.allowed_roles.unwrap_or_default()))
            .requiring_authentication(
                self.is_authentication_required
                    .as_ref()
                    .and_then(coerce_flag)
                    .unwrap_or(false),
            );
        channel.create_date = self.create_date;
        Ok(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> ChannelAttributes {
        ChannelAttributes {
            name: Some("orders".to_string()),
            is_authentication_required: Some(json!(false)),
            allowed_roles: Some(vec![]),
            subscriber_source: Some(json!(1)),
            event_source: Some(json!(3)),
            create_date: None,
        }
    }

    fn failing_fields(attrs: &ChannelAttributes, ctx: UniquenessContext) -> Vec<String> {
        let errors = attrs.validate_with(ctx).unwrap_err();
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|k| k.to_string())
            .collect();
        fields.sort();
        fields
    }

    fn codes_for(attrs: &ChannelAttributes, field: &str) -> Vec<String> {
        let errors = attrs.validate_with(UniquenessContext::default()).unwrap_err();
        errors
            .field_errors()
            .get(field)
            .map(|errs| errs.iter().map(|e| e.code.to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_valid_attributes_pass() {
        assert!(valid().validate_with(UniquenessContext::default()).is_ok());
    }

    #[test]
    fn test_required_fields_accumulate() {
        let attrs = ChannelAttributes::default();
        assert_eq!(
            failing_fields(&attrs, UniquenessContext::default()),
            vec![
                "event_source",
                "is_authentication_required",
                "name",
                "subscriber_source"
            ]
        );
        assert_eq!(codes_for(&attrs, "name"), vec!["required"]);
    }

    #[test]
    fn test_name_too_short() {
        let attrs = ChannelAttributes {
            name: Some("o".to_string()),
            ..valid()
        };
        assert_eq!(codes_for(&attrs, "name"), vec!["length"]);

        let two = ChannelAttributes {
            name: Some("ok".to_string()),
            ..valid()
        };
        assert!(two.validate_with(UniquenessContext::default()).is_ok());
    }

    #[test]
    fn test_name_length_counts_characters() {
        let attrs = ChannelAttributes {
            name: Some("é".to_string()),
            ..valid()
        };
        assert_eq!(codes_for(&attrs, "name"), vec!["length"]);
    }

    #[test]
    fn test_unique_name_for_new_record() {
        let ctx = UniquenessContext {
            record_id: None,
            name_owner: Some(Snowflake::new(10)),
        };
        let errors = valid().validate_with(ctx).unwrap_err();
        let name_errors = errors.field_errors().get("name").cloned().unwrap();
        assert_eq!(name_errors[0].code, "unique");
        assert_eq!(
            name_errors[0].message.as_deref(),
            Some("Channel name should be unique")
        );
    }

    #[test]
    fn test_unique_name_exempts_self() {
        let ctx = UniquenessContext {
            record_id: Some(Snowflake::new(10)),
            name_owner: Some(Snowflake::new(10)),
        };
        assert!(valid().validate_with(ctx).is_ok());

        let other = UniquenessContext {
            record_id: Some(Snowflake::new(11)),
            name_owner: Some(Snowflake::new(10)),
        };
        assert_eq!(failing_fields(&valid(), other), vec!["name"]);
    }

    #[test]
    fn test_sources_accept_only_enumeration() {
        for accepted in [json!(1), json!(2), json!(3), json!("2")] {
            let attrs = ChannelAttributes {
                subscriber_source: Some(accepted.clone()),
                event_source: Some(accepted),
                ..valid()
            };
            assert!(attrs.validate_with(UniquenessContext::default()).is_ok());
        }

        for rejected in [json!(0), json!(4), json!(-1), json!(100)] {
            let attrs = ChannelAttributes {
                event_source: Some(rejected),
                ..valid()
            };
            assert_eq!(codes_for(&attrs, "event_source"), vec!["in"]);
        }

        for not_integer in [json!(1.5), json!("php"), json!(true), json!([1])] {
            let attrs = ChannelAttributes {
                subscriber_source: Some(not_integer),
                ..valid()
            };
            assert_eq!(codes_for(&attrs, "subscriber_source"), vec!["integer"]);
        }
    }

    #[test]
    fn test_authentication_flag_coercion() {
        for accepted in [json!(true), json!(0), json!(1), json!("1")] {
            let attrs = ChannelAttributes {
                is_authentication_required: Some(accepted),
                ..valid()
            };
            assert!(attrs.validate_with(UniquenessContext::default()).is_ok());
        }

        let attrs = ChannelAttributes {
            is_authentication_required: Some(json!(2)),
            ..valid()
        };
        assert_eq!(codes_for(&attrs, "is_authentication_required"), vec!["boolean"]);
    }

    #[test]
    fn test_allowed_roles_rules() {
        let absent = ChannelAttributes {
            allowed_roles: None,
            ..valid()
        };
        assert!(absent.validate_with(UniquenessContext::default()).is_ok());

        let blank = ChannelAttributes {
            allowed_roles: Some(vec!["admin".to_string(), " ".to_string()]),
            ..valid()
        };
        assert_eq!(codes_for(&blank, "allowed_roles"), vec!["roles"]);

        let comma = ChannelAttributes {
            allowed_roles: Some(vec!["admin,guest".to_string()]),
            ..valid()
        };
        assert_eq!(codes_for(&comma, "allowed_roles"), vec!["roles"]);
    }

    #[test]
    fn test_into_channel() {
        let attrs = ChannelAttributes {
            allowed_roles: Some(vec!["admin".to_string(), "guest".to_string()]),
            is_authentication_required: Some(json!(1)),
            ..valid()
        };
        let channel = attrs.into_channel().unwrap();
        assert!(channel.id.is_none());
        assert_eq!(channel.name, "orders");
        assert!(channel.is_authentication_required);
        assert_eq!(channel.subscriber_source, SourceOrigin::Php);
        assert_eq!(channel.event_source, SourceOrigin::Either);
        assert_eq!(channel.allowed_roles.to_stored(), "admin, guest");
    }

    #[test]
    fn test_padded_role_tokens_are_trimmed() {
        let attrs = ChannelAttributes {
            allowed_roles: Some(vec![" admin".to_string(), "guest ".to_string()]),
            ..valid()
        };
        assert!(attrs.validate_with(UniquenessContext::default()).is_ok());

        let channel = attrs.into_channel().unwrap();
        assert_eq!(channel.allowed_roles.as_slice(), ["admin", "guest"]);
        assert_eq!(
            AllowedRoles::from_stored(&channel.allowed_roles.to_stored()),
            channel.allowed_roles
        );
    }

    #[test]
    fn test_into_channel_rejects_invalid() {
        let attrs = ChannelAttributes {
            subscriber_source: Some(json!(7)),
            ..valid()
        };
        assert!(attrs.into_channel().is_err());
    }

    #[test]
    fn test_channel_attributes_round_trip_validate() {
        let channel = valid().into_channel().unwrap();
        assert!(channel
            .attributes()
            .validate_with(UniquenessContext::default())
            .is_ok());
    }
}
