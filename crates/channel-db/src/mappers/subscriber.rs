//! Subscriber entity <-> model mapper

use channel_core::{DomainError, Snowflake, Subscriber};
use chrono::{DateTime, Utc};

use crate::models::SubscriberModel;

/// Convert SubscriberModel to Subscriber entity
impl From<SubscriberModel> for Subscriber {
    fn from(model: SubscriberModel) -> Self {
        Subscriber {
            id: Some(Snowflake::new(model.id)),
            user_id: model.user_id,
            created_at: model.created_at,
        }
    }
}

/// Subscriber values for database insertion
#[derive(Debug)]
pub struct SubscriberRow<'a> {
    pub id: i64,
    pub user_id: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

impl<'a> SubscriberRow<'a> {
    pub fn new(subscriber: &'a Subscriber) -> Result<Self, DomainError> {
        let id = subscriber
            .id
            .ok_or_else(|| DomainError::InternalError("subscriber has no id".to_string()))?;
        Ok(Self {
            id: id.into_inner(),
            user_id: subscriber.user_id.as_deref(),
            created_at: subscriber.created_at,
        })
    }
}
