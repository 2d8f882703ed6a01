//! Channel database models

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

/// Database model for channels table
#[derive(Debug, Clone, FromRow)]
pub struct ChannelModel {
    pub id: i64,
    pub name: String,
    /// 0 or 1
    pub is_authentication_required: i16,
    /// Role tokens joined with ", "
    pub allowed_roles: String,
    pub subscriber_source: i16,
    pub event_source: i16,
    pub create_date: DateTime<Utc>,
}

impl ChannelModel {
    #[inline]
    pub fn requires_authentication(&self) -> bool {
        self.is_authentication_required != 0
    }
}

/// Database model for channel_subscribers table
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionLinkModel {
    pub channel_id: i64,
    pub subscriber_id: i64,
    pub options: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
