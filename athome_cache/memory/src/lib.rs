//! In-process cache for single instance deployments.
//!
//! Items live only as long as the server process. Expired items are dropped
//! lazily on access and whenever the number of stored items doubles.

use std::{collections::HashMap, sync::Arc, time::Duration};

use anyhow::Context;
use athome_cache_contracts::CacheService;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{sync::RwLock, time::Instant};

#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    state: Arc<RwLock<State>>,
}

#[derive(Debug, Default)]
struct State {
    items: HashMap<String, Item>,
    purge_threshold: usize,
}

#[derive(Debug)]
struct Item {
    data: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Item {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

const MIN_PURGE_THRESHOLD: usize = 1024;

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.state
            .read()
            .await
            .items
            .values()
            .filter(|item| !item.is_expired(now))
            .count()
    }
}

impl State {
    fn purge_expired(&mut self, now: Instant) {
        self.items.retain(|_, item| !item.is_expired(now));
        self.purge_threshold = (self.items.len() * 2).max(MIN_PURGE_THRESHOLD);
    }
}

impl CacheService for MemoryCache {
    #[tracing::instrument(level = "trace", skip(self))]
    async fn get<T: DeserializeOwned + 'static>(&self, key: &str) -> anyhow::Result<Option<T>> {
        let now = Instant::now();
        let state = self.state.read().await;
        state
            .items
            .get(key)
            .filter(|item| !item.is_expired(now))
            .map(|item| rmp_serde::from_slice(&item.data))
            .transpose()
            .context("Failed to deserialize cached value")
    }

    #[tracing::instrument(level = "trace", skip(self, value))]
    async fn set<T: Serialize + Sync + 'static>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> anyhow::Result<()> {
        let data = rmp_serde::to_vec(value).context("Failed to serialize value")?;
        let now = Instant::now();

        let mut state = self.state.write().await;
        if state.items.len() >= state.purge_threshold {
            state.purge_expired(now);
        }
        state.items.insert(
            key.into(),
            Item {
                data,
                expires_at: ttl.map(|ttl| now + ttl),
            },
        );

        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
