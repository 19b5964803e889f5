use std::{sync::Arc, time::Duration};

use athome_cache_contracts::CacheService;
use athome_core_health_contracts::{HealthFeatureService, HealthStatus};
use athome_email_contracts::EmailService;
use athome_shared_contracts::time::TimeService;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::error;

#[derive(Debug, Clone)]
pub struct HealthFeatureServiceImpl<Time, Cache, Email> {
    time: Time,
    cache: Cache,
    email: Email,
    config: HealthFeatureConfig,
    state: Arc<State>,
}

#[derive(Debug, Clone, Copy)]
pub struct HealthFeatureConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Default)]
struct State {
    cache: RwLock<Option<CachedStatus>>,
}

#[derive(Debug)]
struct CachedStatus {
    status: HealthStatus,
    timestamp: DateTime<Utc>,
}

impl<Time, Cache, EmailS> HealthFeatureServiceImpl<Time, Cache, EmailS> {
    pub fn new(time: Time, cache: Cache, email: EmailS, config: HealthFeatureConfig) -> Self {
        Self {
            time,
            cache,
            email,
            config,
            state: Default::default(),
        }
    }
}

impl<Time, Cache, EmailS> HealthFeatureService for HealthFeatureServiceImpl<Time, Cache, EmailS>
where
    Time: TimeService,
    Cache: CacheService,
    EmailS: EmailService,
{
    async fn get_status(&self) -> HealthStatus {
        let now = self.time.now();
        let is_fresh = |cached: &&CachedStatus| now < cached.timestamp + self.config.cache_ttl;

        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard.as_ref().filter(is_fresh) {
            return cached.status;
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        if let Some(cached) = cache_guard.as_ref().filter(is_fresh) {
            return cached.status;
        }

        let cache = self
            .cache
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping cache: {err}"))
            .is_ok();

        let email = self
            .email
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping mail backend: {err}"))
            .is_ok();

        let status = HealthStatus { cache, email };

        cache_guard
            .insert(CachedStatus {
                status,
                timestamp: now,
            })
            .status
    }
}
