//! Subscriber service
//!
//! Minimal lifecycle for the records that join channels.

use channel_core::{Record, Snowflake, Subscriber};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::CreateSubscriberRequest;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Subscriber service
pub struct SubscriberService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SubscriberService<'a> {
    /// Create a new SubscriberService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create and store a subscriber, optionally bound to an application user
    #[instrument(skip(self))]
    pub async fn create_subscriber(&self, user_id: Option<String>) -> ServiceResult<Subscriber> {
        let mut subscriber = Subscriber::new(user_id);
        let id = self.ctx.generate_id();
        subscriber.id = Some(id);

        self.ctx.subscriber_repo().create(&subscriber).await?;

        info!(subscriber_id = %id, "Subscriber created");
        Ok(subscriber)
    }

    /// Validate a request, then create the subscriber
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: CreateSubscriberRequest) -> ServiceResult<Subscriber> {
        request.validate()?;
        self.create_subscriber(request.user_id).await
    }

    /// Get subscriber by ID
    #[instrument(skip(self))]
    pub async fn get_subscriber(&self, subscriber_id: Snowflake) -> ServiceResult<Subscriber> {
        self.ctx
            .subscriber_repo()
            .find_by_id(subscriber_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Subscriber", subscriber_id.to_string()))
    }

    /// Delete a persisted subscriber; `false` for an unsaved one.
    /// Storage refuses while the subscriber is still linked to a channel.
    #[instrument(skip(self, subscriber), fields(subscriber_id = ?subscriber.id))]
    pub async fn delete_subscriber(&self, subscriber: &Subscriber) -> ServiceResult<bool> {
        let Some(subscriber_id) = subscriber.id() else {
            return Ok(false);
        };

        self.ctx.subscriber_repo().delete(subscriber_id).await?;
        info!(subscriber_id = %subscriber_id, "Subscriber deleted");
        Ok(true)
    }
}
