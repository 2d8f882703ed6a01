//! The channel rule table and the checks behind each rule

use std::borrow::Cow;

use serde_json::Value;
use validator::ValidationError;

use super::{ChannelAttributes, UniquenessContext};
use crate::value_objects::{coerce_integer, SourceOrigin};

/// Validated channel attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelField {
    Name,
    IsAuthenticationRequired,
    AllowedRoles,
    SubscriberSource,
    EventSource,
}

impl ChannelField {
    /// Attribute name used as the error key
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::IsAuthenticationRequired => "is_authentication_required",
            Self::AllowedRoles => "allowed_roles",
            Self::SubscriberSource => "subscriber_source",
            Self::EventSource => "event_source",
        }
    }

    /// Human readable label used in messages
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::IsAuthenticationRequired => "Is Authentication Required",
            Self::AllowedRoles => "Allowed Roles",
            Self::SubscriberSource => "Subscriber Source",
            Self::EventSource => "Event Source",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present and not blank
    Required,
    /// No other channel holds the same name
    Unique,
    /// At least `min` characters; blank values are skipped when `allow_empty`
    Length { min: usize, allow_empty: bool },
    /// Integer-coercible boolean (`true`/`false`, `0`/`1`, `"0"`/`"1"`)
    Flag,
    /// Integer or a string of digits
    Integer,
    /// Integer that is the stored value of one of the listed origins
    In(&'static [SourceOrigin]),
    /// Every role token is non-blank and free of the stored separator
    RoleTokens,
}

/// The fixed rule table, evaluated in order
pub const CHANNEL_RULES: &[(ChannelField, Rule)] = &[
    (ChannelField::Name, Rule::Required),
    (ChannelField::IsAuthenticationRequired, Rule::Required),
    (ChannelField::SubscriberSource, Rule::Required),
    (ChannelField::EventSource, Rule::Required),
    (ChannelField::Name, Rule::Unique),
    (ChannelField::Name, Rule::Length { min: 2, allow_empty: true }),
    (ChannelField::IsAuthenticationRequired, Rule::Flag),
    (ChannelField::SubscriberSource, Rule::Integer),
    (ChannelField::EventSource, Rule::Integer),
    (ChannelField::SubscriberSource, Rule::In(&SourceOrigin::ALL)),
    (ChannelField::EventSource, Rule::In(&SourceOrigin::ALL)),
    (ChannelField::AllowedRoles, Rule::Length { min: 1, allow_empty: true }),
    (ChannelField::AllowedRoles, Rule::RoleTokens),
];

/// Borrowed view of one attribute
enum FieldValue<'a> {
    Text(Option<&'a str>),
    Raw(Option<&'a Value>),
    Tokens(Option<&'a [String]>),
}

impl FieldValue<'_> {
    fn of(field: ChannelField, attrs: &ChannelAttributes) -> FieldValue<'_> {
        match field {
            ChannelField::Name => FieldValue::Text(attrs.name.as_deref()),
            ChannelField::IsAuthenticationRequired => {
                FieldValue::Raw(attrs.is_authentication_required.as_ref())
            }
            ChannelField::AllowedRoles => FieldValue::Tokens(attrs.allowed_roles.as_deref()),
            ChannelField::SubscriberSource => FieldValue::Raw(attrs.subscriber_source.as_ref()),
            ChannelField::EventSource => FieldValue::Raw(attrs.event_source.as_ref()),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.map_or(true, |t| t.trim().is_empty()),
            Self::Raw(raw) => match raw {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(Value::Array(items)) => items.is_empty(),
                Some(_) => false,
            },
            Self::Tokens(tokens) => tokens.map_or(true, <[String]>::is_empty),
        }
    }

    /// Character length of the value as it would be stored
    fn char_len(&self) -> usize {
        match self {
            Self::Text(text) => text.map_or(0, |t| t.chars().count()),
            Self::Raw(raw) => raw.map_or(0, |v| match v {
                Value::String(s) => s.chars().count(),
                other => other.to_string().chars().count(),
            }),
            Self::Tokens(tokens) => tokens.map_or(0, |t| {
                let joined: usize = t.iter().map(|r| r.trim().chars().count()).sum();
                joined + t.len().saturating_sub(1) * crate::value_objects::ROLE_SEPARATOR.len()
            }),
        }
    }

    fn raw(&self) -> Option<&Value> {
        match self {
            Self::Raw(raw) => *raw,
            _ => None,
        }
    }
}

impl Rule {
    /// Evaluate the rule for one field, returning the error if it fails
    pub(super) fn check(
        self,
        field: ChannelField,
        attrs: &ChannelAttributes,
        ctx: UniquenessContext,
    ) -> Option<ValidationError> {
        let value = FieldValue::of(field, attrs);
        let label = field.label();

        match self {
            Rule::Required => value
                .is_empty()
                .then(|| error("required", format!("{label} cannot be blank."))),
            Rule::Unique => {
                if value.is_empty() {
                    return None;
                }
                let owner = ctx.name_owner?;
                (ctx.record_id != Some(owner))
                    .then(|| error("unique", "Channel name should be unique".to_string()))
            }
            Rule::Length { min, allow_empty } => {
                if allow_empty && value.is_empty() {
                    return None;
                }
                (value.char_len() < min).then(|| {
                    let mut err = error(
                        "length",
                        format!("{label} is too short (minimum is {min} characters)."),
                    );
                    err.add_param(Cow::from("min"), &min);
                    err
                })
            }
            Rule::Flag => {
                let raw = value.raw()?;
                if value.is_empty() {
                    return None;
                }
                coerce_flag(raw)
                    .is_none()
                    .then(|| error("boolean", format!("{label} must be either 0 or 1.")))
            }
            Rule::Integer => {
                let raw = value.raw()?;
                if value.is_empty() {
                    return None;
                }
                coerce_integer(raw)
                    .is_none()
                    .then(|| error("integer", format!("{label} must be an integer.")))
            }
            Rule::In(allowed) => {
                let number = coerce_integer(value.raw()?)?;
                let listed = allowed.iter().any(|origin| i64::from(*origin) == number);
                (!listed).then(|| {
                    let mut err = error("in", format!("{label} is not in the list."));
                    err.add_param(Cow::from("value"), &number);
                    err
                })
            }
            Rule::RoleTokens => {
                let FieldValue::Tokens(Some(tokens)) = value else {
                    return None;
                };
                tokens
                    .iter()
                    .any(|t| t.trim().is_empty() || t.contains(','))
                    .then(|| {
                        error(
                            "roles",
                            format!("{label} must not contain blank or comma-separated tokens."),
                        )
                    })
            }
        }
    }
}

fn error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

/// Coerce an attribute value to a boolean flag
pub fn coerce_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim() {
            "0" => Some(false),
            "1" => Some(true),
            _ => None,
        },
        _ => None,
    }
}
