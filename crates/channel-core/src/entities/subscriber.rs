//! Subscriber entity - something that can join channels

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::Record;
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: Option<Snowflake>,
    /// Application user this subscriber acts for, if any
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Subscriber {
    /// Create an unsaved subscriber
    #[must_use]
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            id: None,
            user_id,
            created_at: Utc::now(),
        }
    }

    /// Build a subscriber for an already persisted ID
    #[must_use]
    pub fn with_id(id: Snowflake) -> Self {
        Self {
            id: Some(id),
            user_id: None,
            created_at: Utc::now(),
        }
    }
}

impl Record for Subscriber {
    fn id(&self) -> Option<Snowflake> {
        self.id
    }
}
