use std::time::Duration;

use anyhow::Context;
use athome_cache_contracts::{cache_key, CacheService};
use athome_core_contact_contracts::rate_limit::{ContactRateLimitError, ContactRateLimitService};
use athome_models::session::SessionId;
use athome_shared_contracts::time::TimeService;
use chrono::{DateTime, Utc};

const NAMESPACE: &str = "contact_last_submission";

#[derive(Debug, Clone)]
pub struct ContactRateLimitServiceImpl<Time, Cache> {
    time: Time,
    cache: Cache,
    config: ContactRateLimitConfig,
}

#[derive(Debug, Clone, Copy)]
pub struct ContactRateLimitConfig {
    pub cooldown: Duration,
}

impl<Time, Cache> ContactRateLimitServiceImpl<Time, Cache> {
    pub fn new(time: Time, cache: Cache, config: ContactRateLimitConfig) -> Self {
        Self {
            time,
            cache,
            config,
        }
    }
}

impl<Time, Cache> ContactRateLimitService for ContactRateLimitServiceImpl<Time, Cache>
where
    Time: TimeService,
    Cache: CacheService,
{
    #[tracing::instrument(skip(self))]
    async fn check(&self, session: SessionId) -> Result<(), ContactRateLimitError> {
        let last = self
            .cache
            .get::<DateTime<Utc>>(&cache_key(NAMESPACE, session))
            .await
            .context("Failed to get last contact submission from cache")?;

        match last {
            Some(last) if self.time.now() < last + self.config.cooldown => {
                Err(ContactRateLimitError::RateLimited)
            }
            _ => Ok(()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn record(&self, session: SessionId) -> anyhow::Result<()> {
        self.cache
            .set(
                &cache_key(NAMESPACE, session),
                &self.time.now(),
                Some(self.config.cooldown),
            )
            .await
            .context("Failed to save last contact submission in cache")
    }
}
