//! PostgreSQL implementation of SubscriberRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use channel_core::{DomainError, RepoResult, Snowflake, Subscriber, SubscriberRepository};

use crate::mappers::SubscriberRow;
use crate::models::SubscriberModel;

use super::error::{map_db_error, map_foreign_key_violation, subscriber_not_found};

/// PostgreSQL implementation of SubscriberRepository
#[derive(Clone)]
pub struct PgSubscriberRepository {
    pool: PgPool,
}

impl PgSubscriberRepository {
    /// Create a new PgSubscriberRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberRepository for PgSubscriberRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Subscriber>> {
        let result = sqlx::query_as::<_, SubscriberModel>(
            r"
            SELECT id, user_id, created_at
            FROM subscribers
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Subscriber::from))
    }

    #[instrument(skip(self))]
    async fn create(&self, subscriber: &Subscriber) -> RepoResult<()> {
        let row = SubscriberRow::new(subscriber)?;

        sqlx::query(
            r"
            INSERT INTO subscribers (id, user_id, created_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(row.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM subscribers
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::SubscriberHasLinks))?;

        if result.rows_affected() == 0 {
            return Err(subscriber_not_found(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgSubscriberRepository>();
    }
}
