//! Channel service
//!
//! Handles channel validation and persistence, subscribe/unsubscribe against
//! the link repository, and the per-channel subscriber snapshot.

use channel_core::{
    Channel, ChannelAttributes, Record, Snowflake, SubscribeOptions, Subscriber,
    SubscriptionLink, UniquenessContext,
};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::dto::{CreateChannelRequest, UpdateChannelRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Channel service
pub struct ChannelService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChannelService<'a> {
    /// Create a new ChannelService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ------------------------------------------------------------------
    // Validation and persistence
    // ------------------------------------------------------------------

    /// Run the channel rule table, including the name lookup
    #[instrument(skip(self, channel), fields(name = %channel.name))]
    pub async fn validate(&self, channel: &Channel) -> ServiceResult<()> {
        self.validate_attributes(&channel.attributes(), channel.id())
            .await
    }

    async fn validate_attributes(
        &self,
        attrs: &ChannelAttributes,
        record_id: Option<Snowflake>,
    ) -> ServiceResult<()> {
        let name_owner = match attrs.name.as_deref() {
            Some(name) if !name.trim().is_empty() => self
                .ctx
                .channel_repo()
                .find_by_name(name)
                .await?
                .and_then(|existing| existing.id),
            _ => None,
        };

        attrs.validate_with(UniquenessContext {
            record_id,
            name_owner,
        })?;
        Ok(())
    }

    /// Validate, then insert (new channel) or update (persisted channel).
    ///
    /// A new channel receives its ID and, when absent, its create date.
    #[instrument(skip(self, channel), fields(name = %channel.name))]
    pub async fn save(&self, channel: &mut Channel) -> ServiceResult<()> {
        self.validate(channel).await?;
        self.persist(channel).await
    }

    async fn persist(&self, channel: &mut Channel) -> ServiceResult<()> {
        if !channel.is_new_record() {
            self.ctx.channel_repo().update(channel).await?;
            debug!(channel_id = ?channel.id, "Channel updated");
            return Ok(());
        }

        let previous_create_date = channel.create_date;
        let id = self.ctx.generate_id();
        channel.mark_persisted(id, Utc::now());

        if let Err(e) = self.ctx.channel_repo().create(channel).await {
            channel.id = None;
            channel.create_date = previous_create_date;
            return Err(e.into());
        }

        info!(channel_id = %id, name = %channel.name, "Channel created");
        Ok(())
    }

    /// Create a channel from raw request attributes
    #[instrument(skip(self, request))]
    pub async fn create_channel(&self, request: CreateChannelRequest) -> ServiceResult<Channel> {
        let attrs = request.into_attributes();
        self.validate_attributes(&attrs, None).await?;

        let mut channel = attrs.into_channel()?;
        self.persist(&mut channel).await?;
        Ok(channel)
    }

    /// Apply a partial metadata update. Existing links are left as they are.
    #[instrument(skip(self, request))]
    pub async fn update_channel(
        &self,
        channel_id: Snowflake,
        request: UpdateChannelRequest,
    ) -> ServiceResult<Channel> {
        let current = self.get_channel(channel_id).await?;
        let attrs = request.apply_to(&current);
        self.validate_attributes(&attrs, Some(channel_id)).await?;

        let mut channel = attrs.into_channel()?;
        channel.id = Some(channel_id);
        channel.create_date = current.create_date;
        self.persist(&mut channel).await?;

        info!(channel_id = %channel_id, "Channel metadata updated");
        Ok(channel)
    }

    /// Get channel by ID
    #[instrument(skip(self))]
    pub async fn get_channel(&self, channel_id: Snowflake) -> ServiceResult<Channel> {
        self.ctx
            .channel_repo()
            .find_by_id(channel_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Channel", channel_id.to_string()))
    }

    /// Find a channel by its exact name
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> ServiceResult<Option<Channel>> {
        Ok(self.ctx.channel_repo().find_by_name(name).await?)
    }

    /// Delete a persisted channel.
    ///
    /// Returns `false` for an unsaved channel. Links are not removed here;
    /// storage refuses to delete a channel that still has subscribers.
    #[instrument(skip(self, channel), fields(channel_id = ?channel.id))]
    pub async fn delete_channel(&self, channel: &Channel) -> ServiceResult<bool> {
        let Some(channel_id) = channel.id() else {
            return Ok(false);
        };

        self.ctx.channel_repo().delete(channel_id).await?;
        info!(channel_id = %channel_id, "Channel deleted");
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Subscribe a subscriber to a channel.
    ///
    /// Returns `false` when either record is unsaved or storage rejects the
    /// new link, `true` when the link exists afterwards.
    #[instrument(
        skip(self, channel, subscriber, options),
        fields(channel_id = ?channel.id, subscriber_id = ?subscriber.id)
    )]
    pub async fn subscribe(
        &self,
        channel: &Channel,
        subscriber: &Subscriber,
        options: SubscribeOptions,
    ) -> ServiceResult<bool> {
        let Some(link) = SubscriptionLink::between(channel, subscriber, options) else {
            debug!("Subscribe skipped for unsaved record");
            return Ok(false);
        };
        let (channel_id, subscriber_id) = link.key();

        if self
            .ctx
            .link_repo()
            .find(channel_id, subscriber_id)
            .await?
            .is_some()
        {
            debug!("Already subscribed");
            return Ok(true);
        }

        match self.ctx.link_repo().create_link(&link).await {
            Ok(()) => {
                info!(channel_id = %channel_id, subscriber_id = %subscriber_id, "Subscribed");
                Ok(true)
            }
            Err(e) => {
                warn!(
                    channel_id = %channel_id,
                    subscriber_id = %subscriber_id,
                    error = %e,
                    "Subscribe rejected by storage"
                );
                Ok(false)
            }
        }
    }

    /// Unsubscribe a subscriber from a channel.
    ///
    /// Unsaved records and missing links count as already unsubscribed. On a
    /// successful delete the subscriber is evicted from the channel's
    /// snapshot; on a rejected delete the snapshot is left untouched.
    #[instrument(
        skip(self, channel, subscriber),
        fields(channel_id = ?channel.id, subscriber_id = ?subscriber.id)
    )]
    pub async fn unsubscribe(
        &self,
        channel: &mut Channel,
        subscriber: &Subscriber,
    ) -> ServiceResult<bool> {
        let (Some(channel_id), Some(subscriber_id)) = (channel.id(), subscriber.id()) else {
            debug!("Unsubscribe skipped for unsaved record");
            return Ok(true);
        };

        if self
            .ctx
            .link_repo()
            .find(channel_id, subscriber_id)
            .await?
            .is_none()
        {
            debug!("Not subscribed");
            return Ok(true);
        }

        match self.ctx.link_repo().delete(channel_id, subscriber_id).await {
            Ok(()) => {
                channel.evict_subscriber(subscriber_id);
                info!(channel_id = %channel_id, subscriber_id = %subscriber_id, "Unsubscribed");
                Ok(true)
            }
            Err(e) => {
                warn!(
                    channel_id = %channel_id,
                    subscriber_id = %subscriber_id,
                    error = %e,
                    "Unsubscribe rejected by storage"
                );
                Ok(false)
            }
        }
    }

    /// Subscribers of a channel.
    ///
    /// Returns the channel's snapshot when one is loaded and `refresh` is
    /// false; otherwise reloads it from storage. An unsaved channel has no
    /// subscribers and nothing is cached for it.
    #[instrument(skip(self, channel), fields(channel_id = ?channel.id))]
    pub async fn get_subscribers<'c>(
        &self,
        channel: &'c mut Channel,
        refresh: bool,
    ) -> ServiceResult<&'c [Subscriber]> {
        if !refresh && channel.cached_subscribers().is_some() {
            return Ok(channel.cached_subscribers().unwrap_or_default());
        }

        let Some(channel_id) = channel.id() else {
            return Ok(&[]);
        };

        let subscribers = self.ctx.link_repo().find_subscribers(channel_id).await?;
        debug!(count = subscribers.len(), "Subscribers loaded");
        Ok(channel.cache_subscribers(subscribers))
    }

    /// Number of stored links for a channel
    #[instrument(skip(self))]
    pub async fn subscriber_count(&self, channel_id: Snowflake) -> ServiceResult<i64> {
        Ok(self.ctx.link_repo().count_by_channel(channel_id).await?)
    }
}
