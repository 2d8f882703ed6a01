//! Subscriber database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for subscribers table
#[derive(Debug, Clone, FromRow)]
pub struct SubscriberModel {
    pub id: i64,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
