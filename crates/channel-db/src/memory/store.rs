//! In-memory implementation of every repository port
//!
//! Mirrors the PostgreSQL schema constraints: unique channel names, one link
//! per pair, and links that must point at stored records and block deletion.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use channel_core::{
    Channel, ChannelRepository, DomainError, RepoResult, Snowflake, Subscriber,
    SubscriberRepository, SubscriptionLink, SubscriptionLinkRepository,
};

#[derive(Default)]
struct State {
    channels: HashMap<Snowflake, Channel>,
    subscribers: HashMap<Snowflake, Subscriber>,
    /// Kept in insertion order
    links: Vec<SubscriptionLink>,
}

impl State {
    fn name_owner(&self, name: &str) -> Option<Snowflake> {
        self.channels
            .values()
            .find(|c| c.name == name)
            .and_then(|c| c.id)
    }

    fn link_position(&self, channel_id: Snowflake, subscriber_id: Snowflake) -> Option<usize> {
        self.links
            .iter()
            .position(|l| l.key() == (channel_id, subscriber_id))
    }
}

/// Shared in-memory store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of link rows across all channels
    pub fn link_count(&self) -> usize {
        self.state.read().links.len()
    }
}

fn require_id(id: Option<Snowflake>, what: &str) -> RepoResult<Snowflake> {
    id.ok_or_else(|| DomainError::InternalError(format!("{what} has no id")))
}

/// Copy of a channel as storage holds it, without the subscriber snapshot
fn stored_copy(channel: &Channel) -> Channel {
    let mut stored = channel.clone();
    stored.forget_subscribers();
    stored
}

#[async_trait]
impl ChannelRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>> {
        Ok(self.state.read().channels.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Channel>> {
        let state = self.state.read();
        Ok(state.channels.values().find(|c| c.name == name).cloned())
    }

    async fn create(&self, channel: &Channel) -> RepoResult<()> {
        let id = require_id(channel.id, "channel")?;
        let mut state = self.state.write();

        if state.channels.contains_key(&id) {
            return Err(DomainError::DatabaseError(format!(
                "duplicate channel id {id}"
            )));
        }
        if state.name_owner(&channel.name).is_some() {
            return Err(DomainError::ChannelNameTaken(channel.name.clone()));
        }

        state.channels.insert(id, stored_copy(channel));
        Ok(())
    }

    async fn update(&self, channel: &Channel) -> RepoResult<()> {
        let id = require_id(channel.id, "channel")?;
        let mut state = self.state.write();

        if !state.channels.contains_key(&id) {
            return Err(DomainError::ChannelNotFound(id));
        }
        if state
            .name_owner(&channel.name)
            .is_some_and(|owner| owner != id)
        {
            return Err(DomainError::ChannelNameTaken(channel.name.clone()));
        }

        state.channels.insert(id, stored_copy(channel));
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.state.write();

        if state.links.iter().any(|l| l.channel_id == id) {
            return Err(DomainError::ChannelHasSubscribers);
        }
        state
            .channels
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::ChannelNotFound(id))
    }
}

#[async_trait]
impl SubscriberRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Subscriber>> {
        Ok(self.state.read().subscribers.get(&id).cloned())
    }

    async fn create(&self, subscriber: &Subscriber) -> RepoResult<()> {
        let id = require_id(subscriber.id, "subscriber")?;
        let mut state = self.state.write();

        if state.subscribers.contains_key(&id) {
            return Err(DomainError::DatabaseError(format!(
                "duplicate subscriber id {id}"
            )));
        }
        state.subscribers.insert(id, subscriber.clone());
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.state.write();

        if state.links.iter().any(|l| l.subscriber_id == id) {
            return Err(DomainError::SubscriberHasLinks);
        }
        state
            .subscribers
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::SubscriberNotFound(id))
    }
}

#[async_trait]
impl SubscriptionLinkRepository for MemoryStore {
    async fn find(
        &self,
        channel_id: Snowflake,
        subscriber_id: Snowflake,
    ) -> RepoResult<Option<SubscriptionLink>> {
        let state = self.state.read();
        Ok(state
            .link_position(channel_id, subscriber_id)
            .map(|i| state.links[i].clone()))
    }

    async fn create_link(&self, link: &SubscriptionLink) -> RepoResult<()> {
        let mut state = self.state.write();

        if !state.channels.contains_key(&link.channel_id) {
            return Err(DomainError::DatabaseError(format!(
                "link references unknown channel {}",
                link.channel_id
            )));
        }
        if !state.subscribers.contains_key(&link.subscriber_id) {
            return Err(DomainError::DatabaseError(format!(
                "link references unknown subscriber {}",
                link.subscriber_id
            )));
        }
        // Existing pair: leave the row as it is
        if state
            .link_position(link.channel_id, link.subscriber_id)
            .is_none()
        {
            state.links.push(link.clone());
        }
        Ok(())
    }

    async fn delete(&self, channel_id: Snowflake, subscriber_id: Snowflake) -> RepoResult<()> {
        let mut state = self.state.write();
        if let Some(index) = state.link_position(channel_id, subscriber_id) {
            state.links.remove(index);
        }
        Ok(())
    }

    async fn find_subscribers(&self, channel_id: Snowflake) -> RepoResult<Vec<Subscriber>> {
        let state = self.state.read();
        Ok(state
            .links
            .iter()
            .filter(|l| l.channel_id == channel_id)
            .filter_map(|l| state.subscribers.get(&l.subscriber_id).cloned())
            .collect())
    }

    async fn count_by_channel(&self, channel_id: Snowflake) -> RepoResult<i64> {
        let state = self.state.read();
        Ok(state.links.iter().filter(|l| l.channel_id == channel_id).count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use channel_core::SubscribeOptions;
    use chrono::Utc;

    fn channel(id: i64, name: &str) -> Channel {
        let mut channel = Channel::new(name);
        channel.mark_persisted(Snowflake::new(id), Utc::now());
        channel
    }

    fn subscriber(id: i64) -> Subscriber {
        Subscriber::with_id(Snowflake::new(id))
    }

    fn link(channel: &Channel, subscriber: &Subscriber) -> SubscriptionLink {
        SubscriptionLink::between(channel, subscriber, SubscribeOptions::new()).unwrap()
    }

    #[tokio::test]
    async fn test_channel_name_is_unique() {
        let store = MemoryStore::new();
        ChannelRepository::create(&store, &channel(1, "orders"))
            .await
            .unwrap();

        let err = ChannelRepository::create(&store, &channel(2, "orders"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ChannelNameTaken(_)));

        // Updating a channel with its own name is fine
        let mut renamed = channel(1, "orders");
        renamed.is_authentication_required = true;
        store.update(&renamed).await.unwrap();
        let found = store.find_by_name("orders").await.unwrap().unwrap();
        assert!(found.is_authentication_required);
    }

    #[tokio::test]
    async fn test_find_by_name_is_case_sensitive() {
        let store = MemoryStore::new();
        ChannelRepository::create(&store, &channel(1, "orders"))
            .await
            .unwrap();
        assert!(store.find_by_name("Orders").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stored_channel_has_no_snapshot() {
        let store = MemoryStore::new();
        let mut original = channel(1, "orders");
        original.cache_subscribers(vec![subscriber(5)]);
        ChannelRepository::create(&store, &original).await.unwrap();

        let loaded = ChannelRepository::find_by_id(&store, Snowflake::new(1))
            .await
            .unwrap()
            .unwrap();
        assert!(loaded.cached_subscribers().is_none());
    }

    #[tokio::test]
    async fn test_links_are_unique_and_ordered() {
        let store = MemoryStore::new();
        let orders = channel(1, "orders");
        ChannelRepository::create(&store, &orders).await.unwrap();
        for id in [30, 10, 20] {
            SubscriberRepository::create(&store, &subscriber(id))
                .await
                .unwrap();
            store
                .create_link(&link(&orders, &subscriber(id)))
                .await
                .unwrap();
        }
        // Duplicate pair is accepted without a second row
        store
            .create_link(&link(&orders, &subscriber(10)))
            .await
            .unwrap();

        assert_eq!(store.count_by_channel(Snowflake::new(1)).await.unwrap(), 3);
        let ids: Vec<i64> = store
            .find_subscribers(Snowflake::new(1))
            .await
            .unwrap()
            .iter()
            .filter_map(|s| s.id.map(Snowflake::into_inner))
            .collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[tokio::test]
    async fn test_link_requires_stored_records() {
        let store = MemoryStore::new();
        let orders = channel(1, "orders");
        let err = store
            .create_link(&link(&orders, &subscriber(2)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
        assert_eq!(store.link_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_is_restricted_while_linked() {
        let store = MemoryStore::new();
        let orders = channel(1, "orders");
        let member = subscriber(2);
        ChannelRepository::create(&store, &orders).await.unwrap();
        SubscriberRepository::create(&store, &member).await.unwrap();
        store.create_link(&link(&orders, &member)).await.unwrap();

        let err = ChannelRepository::delete(&store, Snowflake::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ChannelHasSubscribers));
        let err = SubscriberRepository::delete(&store, Snowflake::new(2))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SubscriberHasLinks));

        SubscriptionLinkRepository::delete(&store, Snowflake::new(1), Snowflake::new(2))
            .await
            .unwrap();
        ChannelRepository::delete(&store, Snowflake::new(1))
            .await
            .unwrap();
        SubscriberRepository::delete(&store, Snowflake::new(2))
            .await
            .unwrap();
    }
}
