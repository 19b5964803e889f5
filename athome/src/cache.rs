use std::time::Duration;

use athome_cache_contracts::CacheService;
use athome_cache_memory::MemoryCache;
use athome_cache_valkey::{ValkeyCache, ValkeyCacheConfig};
use athome_config::{CacheConfig, ValkeyConfig};
use serde::{de::DeserializeOwned, Serialize};

/// The cache backend selected in the config.
#[derive(Debug, Clone)]
pub enum Cache {
    Memory(MemoryCache),
    Valkey(ValkeyCache),
}

/// Connect to the configured cache backend
pub async fn connect(config: &CacheConfig) -> anyhow::Result<Cache> {
    match config {
        CacheConfig::Memory => Ok(Cache::Memory(MemoryCache::new())),
        CacheConfig::Valkey(config) => connect_valkey(config).await.map(Cache::Valkey),
    }
}

async fn connect_valkey(config: &ValkeyConfig) -> anyhow::Result<ValkeyCache> {
    ValkeyCache::connect(&ValkeyCacheConfig {
        url: config.url.clone(),
        max_connections: config.max_connections,
        min_connections: config.min_connections,
        acquire_timeout: config.acquire_timeout.into(),
        idle_timeout: config.idle_timeout.map(Into::into),
        max_lifetime: config.max_lifetime.map(Into::into),
    })
    .await
}

impl CacheService for Cache {
    async fn get<T: DeserializeOwned + 'static>(&self, key: &str) -> anyhow::Result<Option<T>> {
        match self {
            Self::Memory(cache) => cache.get(key).await,
            Self::Valkey(cache) => cache.get(key).await,
        }
    }

    async fn set<T: Serialize + Sync + 'static>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> anyhow::Result<()> {
        match self {
            Self::Memory(cache) => cache.set(key, value, ttl).await,
            Self::Valkey(cache) => cache.set(key, value, ttl).await,
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        match self {
            Self::Memory(cache) => cache.ping().await,
            Self::Valkey(cache) => cache.ping().await,
        }
    }
}
