//! Response DTOs
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Channel response in its stored shape
#[derive(Debug, Clone, Serialize)]
pub struct ChannelResponse {
    pub id: String,
    pub name: String,
    /// 0 or 1
    pub is_authentication_required: i16,
    /// Role tokens joined with ", "
    pub allowed_roles: String,
    pub subscriber_source: i16,
    pub event_source: i16,
    pub create_date: Option<DateTime<Utc>>,
}

/// Subscriber response
#[derive(Debug, Clone, Serialize)]
pub struct SubscriberResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Channel members listing
#[derive(Debug, Clone, Serialize)]
pub struct ChannelSubscribersResponse {
    pub channel_id: String,
    pub subscribers: Vec<SubscriberResponse>,
}
