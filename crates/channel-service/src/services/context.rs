//! Service context - dependency container for services
//!
//! Holds the repositories and the ID generator needed by services.

use std::sync::Arc;

use channel_common::{AppConfig, AppError};
use channel_core::{
    ChannelRepository, Snowflake, SnowflakeGenerator, SubscriberRepository,
    SubscriptionLinkRepository,
};
use channel_db::{
    create_pool, run_migrations, MemoryStore, PgChannelRepository, PgSubscriberRepository,
    PgSubscriptionLinkRepository,
};
use tracing::info;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the dependency container that gets passed to all services.
/// It provides access to:
/// - Channel, subscriber and subscription link repositories
/// - Snowflake generator for ID generation
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    channel_repo: Arc<dyn ChannelRepository>,
    subscriber_repo: Arc<dyn SubscriberRepository>,
    link_repo: Arc<dyn SubscriptionLinkRepository>,

    // Services
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        channel_repo: Arc<dyn ChannelRepository>,
        subscriber_repo: Arc<dyn SubscriberRepository>,
        link_repo: Arc<dyn SubscriptionLinkRepository>,
        snowflake_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            channel_repo,
            subscriber_repo,
            link_repo,
            snowflake_generator,
        }
    }

    /// Connect to PostgreSQL, apply migrations and wire the Pg repositories
    pub async fn connect(config: &AppConfig) -> ServiceResult<Self> {
        let pool = create_pool(&config.database)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(
            app = %config.app.name,
            worker_id = config.snowflake.worker_id,
            "Service context connected"
        );

        Ok(Self::new(
            Arc::new(PgChannelRepository::new(pool.clone())),
            Arc::new(PgSubscriberRepository::new(pool.clone())),
            Arc::new(PgSubscriptionLinkRepository::new(pool)),
            Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)),
        ))
    }

    /// Wire every port to one in-memory store
    pub fn in_memory(store: MemoryStore, worker_id: u16) -> Self {
        let store = Arc::new(store);
        Self::new(
            store.clone(),
            store.clone(),
            store,
            Arc::new(SnowflakeGenerator::new(worker_id)),
        )
    }

    // === Repositories ===

    /// Get the channel repository
    pub fn channel_repo(&self) -> &dyn ChannelRepository {
        self.channel_repo.as_ref()
    }

    /// Get the subscriber repository
    pub fn subscriber_repo(&self) -> &dyn SubscriberRepository {
        self.subscriber_repo.as_ref()
    }

    /// Get the subscription link repository
    pub fn link_repo(&self) -> &dyn SubscriptionLinkRepository {
        self.link_repo.as_ref()
    }

    // === Services ===

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    channel_repo: Option<Arc<dyn ChannelRepository>>,
    subscriber_repo: Option<Arc<dyn SubscriberRepository>>,
    link_repo: Option<Arc<dyn SubscriptionLinkRepository>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel_repo(mut self, repo: Arc<dyn ChannelRepository>) -> Self {
        self.channel_repo = Some(repo);
        self
    }

    pub fn subscriber_repo(mut self, repo: Arc<dyn SubscriberRepository>) -> Self {
        self.subscriber_repo = Some(repo);
        self
    }

    pub fn link_repo(mut self, repo: Arc<dyn SubscriptionLinkRepository>) -> Self {
        self.link_repo = Some(repo);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if a repository is missing. A missing
    /// generator falls back to worker 0.
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let missing = |name: &str| ServiceError::internal(format!("{name} is required"));
        Ok(ServiceContext::new(
            self.channel_repo.ok_or_else(|| missing("channel_repo"))?,
            self.subscriber_repo.ok_or_else(|| missing("subscriber_repo"))?,
            self.link_repo.ok_or_else(|| missing("link_repo"))?,
            self.snowflake_generator.unwrap_or_default(),
        ))
    }
}
