//! PostgreSQL implementation of SubscriptionLinkRepository

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use channel_core::{
    RepoResult, Snowflake, Subscriber, SubscriptionLink, SubscriptionLinkRepository,
};

use crate::models::{SubscriberModel, SubscriptionLinkModel};

use super::error::map_db_error;

/// PostgreSQL implementation of SubscriptionLinkRepository
#[derive(Clone)]
pub struct PgSubscriptionLinkRepository {
    pool: PgPool,
}

impl PgSubscriptionLinkRepository {
    /// Create a new PgSubscriptionLinkRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionLinkRepository for PgSubscriptionLinkRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        channel_id: Snowflake,
        subscriber_id: Snowflake,
    ) -> RepoResult<Option<SubscriptionLink>> {
        let result = sqlx::query_as::<_, SubscriptionLinkModel>(
            r"
            SELECT channel_id, subscriber_id, options, created_at
            FROM channel_subscribers
            WHERE channel_id = $1 AND subscriber_id = $2
            ",
        )
        .bind(channel_id.into_inner())
        .bind(subscriber_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(SubscriptionLink::from))
    }

    #[instrument(
        skip(self, link),
        fields(channel_id = %link.channel_id, subscriber_id = %link.subscriber_id)
    )]
    async fn create_link(&self, link: &SubscriptionLink) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO channel_subscribers (channel_id, subscriber_id, options, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (channel_id, subscriber_id) DO NOTHING
            ",
        )
        .bind(link.channel_id.into_inner())
        .bind(link.subscriber_id.into_inner())
        .bind(Json(link.options.clone()))
        .bind(link.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, channel_id: Snowflake, subscriber_id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r"
            DELETE FROM channel_subscribers
            WHERE channel_id = $1 AND subscriber_id = $2
            ",
        )
        .bind(channel_id.into_inner())
        .bind(subscriber_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_subscribers(&self, channel_id: Snowflake) -> RepoResult<Vec<Subscriber>> {
        let results = sqlx::query_as::<_, SubscriberModel>(
            r"
            SELECT s.id, s.user_id, s.created_at
            FROM channel_subscribers l
            JOIN subscribers s ON s.id = l.subscriber_id
            WHERE l.channel_id = $1
            ORDER BY l.created_at, l.subscriber_id
            ",
        )
        .bind(channel_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Subscriber::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_by_channel(&self, channel_id: Snowflake) -> RepoResult<i64> {
        let result = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM channel_subscribers WHERE channel_id = $1
            ",
        )
        .bind(channel_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }
}
