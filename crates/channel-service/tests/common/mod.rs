//! Shared fixtures for service tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use channel_core::{
    DomainError, RepoResult, Snowflake, SnowflakeGenerator, Subscriber, SubscriptionLink,
    SubscriptionLinkRepository,
};
use channel_db::MemoryStore;
use channel_service::dto::CreateChannelRequest;
use channel_service::{ChannelService, ServiceContext, SubscriberService};

/// In-memory context plus a handle on the shared store
pub struct Harness {
    pub store: MemoryStore,
    pub ctx: ServiceContext,
}

impl Harness {
    pub fn new() -> Self {
        let _ = channel_common::try_init_tracing();
        let store = MemoryStore::new();
        let ctx = ServiceContext::in_memory(store.clone(), 1);
        Self { store, ctx }
    }

    /// Same store, but link writes and deletes can be switched to fail
    pub fn with_flaky_links() -> (Self, Arc<FlakyLinks>) {
        let _ = channel_common::try_init_tracing();
        let store = MemoryStore::new();
        let links = Arc::new(FlakyLinks::new(store.clone()));
        let shared = Arc::new(store.clone());
        let ctx = ServiceContext::new(
            shared.clone(),
            shared,
            links.clone(),
            Arc::new(SnowflakeGenerator::new(2)),
        );
        (Self { store, ctx }, links)
    }

    pub fn channels(&self) -> ChannelService<'_> {
        ChannelService::new(&self.ctx)
    }

    pub fn subscribers(&self) -> SubscriberService<'_> {
        SubscriberService::new(&self.ctx)
    }

    /// Create and store a channel with the given sources
    pub async fn channel(
        &self,
        name: &str,
        subscriber_source: i64,
        event_source: i64,
    ) -> channel_core::Channel {
        let request =
            CreateChannelRequest::named(name).with_sources(subscriber_source, event_source);
        self.channels().create_channel(request).await.unwrap()
    }

    pub async fn subscriber(&self) -> Subscriber {
        self.subscribers().create_subscriber(None).await.unwrap()
    }
}

/// Link repository whose writes can be made to fail on demand
pub struct FlakyLinks {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl FlakyLinks {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> RepoResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(DomainError::DatabaseError("connection reset".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SubscriptionLinkRepository for FlakyLinks {
    async fn find(
        &self,
        channel_id: Snowflake,
        subscriber_id: Snowflake,
    ) -> RepoResult<Option<SubscriptionLink>> {
        self.inner.find(channel_id, subscriber_id).await
    }

    async fn create_link(&self, link: &SubscriptionLink) -> RepoResult<()> {
        self.check()?;
        self.inner.create_link(link).await
    }

    async fn delete(&self, channel_id: Snowflake, subscriber_id: Snowflake) -> RepoResult<()> {
        self.check()?;
        SubscriptionLinkRepository::delete(&self.inner, channel_id, subscriber_id).await
    }

    async fn find_subscribers(&self, channel_id: Snowflake) -> RepoResult<Vec<Subscriber>> {
        self.inner.find_subscribers(channel_id).await
    }

    async fn count_by_channel(&self, channel_id: Snowflake) -> RepoResult<i64> {
        self.inner.count_by_channel(channel_id).await
    }
}
