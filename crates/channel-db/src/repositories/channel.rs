//! PostgreSQL implementation of ChannelRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use channel_core::{Channel, ChannelRepository, DomainError, RepoResult, Snowflake};

use crate::mappers::ChannelRow;
use crate::models::ChannelModel;

use super::error::{
    channel_not_found, map_db_error, map_foreign_key_violation, map_unique_violation,
};

/// Insert statement; columns follow `Channel::ATTRIBUTES`
const INSERT_CHANNEL: &str = r"
    INSERT INTO channels (id, name, is_authentication_required, allowed_roles,
                          subscriber_source, event_source, create_date)
    VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, NOW()))
";

/// PostgreSQL implementation of ChannelRepository
#[derive(Clone)]
pub struct PgChannelRepository {
    pool: PgPool,
}

impl PgChannelRepository {
    /// Create a new PgChannelRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChannelRepository for PgChannelRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>> {
        let result = sqlx::query_as::<_, ChannelModel>(
            r"
            SELECT id, name, is_authentication_required, allowed_roles,
                   subscriber_source, event_source, create_date
            FROM channels
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Channel::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Channel>> {
        let result = sqlx::query_as::<_, ChannelModel>(
            r"
            SELECT id, name, is_authentication_required, allowed_roles,
                   subscriber_source, event_source, create_date
            FROM channels
            WHERE name = $1
            ",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Channel::try_from).transpose()
    }

    #[instrument(skip(self, channel), fields(name = %channel.name))]
    async fn create(&self, channel: &Channel) -> RepoResult<()> {
        let row = ChannelRow::new(channel)?;

        sqlx::query(INSERT_CHANNEL)
            .bind(row.id)
            .bind(row.name)
            .bind(row.is_authentication_required)
            .bind(&row.allowed_roles)
            .bind(row.subscriber_source)
            .bind(row.event_source)
            .bind(channel.create_date)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(e, || DomainError::ChannelNameTaken(channel.name.clone()))
            })?;

        Ok(())
    }

    #[instrument(skip(self, channel), fields(name = %channel.name))]
    async fn update(&self, channel: &Channel) -> RepoResult<()> {
        let row = ChannelRow::new(channel)?;

        let result = sqlx::query(
            r"
            UPDATE channels
            SET name = $2, is_authentication_required = $3, allowed_roles = $4,
                subscriber_source = $5, event_source = $6
            WHERE id = $1
            ",
        )
        .bind(row.id)
        .bind(row.name)
        .bind(row.is_authentication_required)
        .bind(&row.allowed_roles)
        .bind(row.subscriber_source)
        .bind(row.event_source)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::ChannelNameTaken(channel.name.clone()))
        })?;

        if result.rows_affected() == 0 {
            return Err(channel_not_found(Snowflake::new(row.id)));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM channels
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::ChannelHasSubscribers))?;

        if result.rows_affected() == 0 {
            return Err(channel_not_found(id));
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
        assert_send_sync::<PgChannelRepository>();
    }

    #[test]
    fn test_insert_writes_every_attribute() {
        let start = INSERT_CHANNEL.find('(').unwrap() + 1;
        let end = INSERT_CHANNEL.find(')').unwrap();
        let columns: Vec<&str> = INSERT_CHANNEL[start..end].split(',').map(str::trim).collect();
        assert_eq!(columns, Channel::ATTRIBUTES);
    }

    #[test]
    fn test_migration_declares_every_attribute() {
        let migration = include_str!("../../migrations/20240101000000_create_channels.sql");
        let table = migration
            .split("CREATE TABLE IF NOT EXISTS channels (")
            .nth(1)
            .and_then(|rest| rest.split(");").next())
            .unwrap();
        let columns: Vec<&str> = table
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .filter(|word| word.chars().all(|c| c.is_ascii_lowercase() || c == '_'))
            .collect();
        assert_eq!(columns, Channel::ATTRIBUTES);
    }
}
