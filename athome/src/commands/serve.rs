use athome_cache_contracts::CacheService;
use athome_config::Config;
use athome_email_contracts::EmailService;
use tracing::info;

use crate::{cache, email, environment};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Connecting to cache");
    let cache = cache::connect(&config.cache).await?;
    cache.ping().await?;

    info!("Connecting to mail backend");
    let email = email::connect(&config.email)?;
    email.ping().await?;

    let server = environment::rest_server(&config, cache, email);
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve().await
}
