use std::{net::SocketAddr, sync::Arc};

use athome_api_rest::{RestServerConfig, RestServerRealIpConfig};
use athome_config::{Config, SubmitConfig, SubmitTransportConfig};
use athome_core_contact_impl::{rate_limit::ContactRateLimitConfig, ContactFeatureConfig};
use athome_core_health_impl::HealthFeatureConfig;
use athome_submit_impl::{
    http::HttpClient, ConfiguredTransport, EndpointTransport, MailtoTransport, RelayTransport,
};
use types::{Cache, ContactFeature, ContactRateLimit, Email, HealthFeature, RestServer, Time};

pub mod types;

/// Wires the services of the REST server on top of the connected backends.
pub fn rest_server(config: &Config, cache: Cache, email: Email) -> RestServer {
    let time = Time::default();

    let health = HealthFeature::new(
        time,
        cache.clone(),
        email.clone(),
        HealthFeatureConfig {
            cache_ttl: config.health.cache_ttl.into(),
        },
    );

    let contact_rate_limit = ContactRateLimit::new(
        time,
        cache,
        ContactRateLimitConfig {
            cooldown: config.contact.cooldown.into(),
        },
    );
    let contact = ContactFeature::new(
        time,
        contact_rate_limit,
        email,
        ContactFeatureConfig {
            recipient: config.contact.recipient.clone().into(),
        },
    );

    RestServer::new(health, contact, rest_server_config(config))
}

fn rest_server_config(config: &Config) -> RestServerConfig {
    RestServerConfig {
        addr: SocketAddr::new(config.http.host, config.http.port),
        real_ip_config: config.http.real_ip.as_ref().map(|real_ip| {
            Arc::new(RestServerRealIpConfig {
                header: real_ip.header.clone(),
                set_from: real_ip.set_from,
            })
        }),
        allowed_origins: config.http.allowed_origins.clone().into(),
    }
}

/// Builds the transport used to hand contact form submissions over.
pub fn submit_transport(config: &SubmitConfig) -> anyhow::Result<ConfiguredTransport> {
    let timeout = config.timeout.into();
    Ok(match &config.transport {
        SubmitTransportConfig::Endpoint { url } => ConfiguredTransport::Endpoint(
            EndpointTransport::new(HttpClient::new(timeout)?, url.clone()),
        ),
        SubmitTransportConfig::Relay { url, token } => {
            ConfiguredTransport::Relay(RelayTransport::new(
                HttpClient::new(timeout)?,
                HttpClient::without_redirects(timeout)?,
                url,
                token,
            )?)
        }
        SubmitTransportConfig::Mailto { recipient } => {
            ConfiguredTransport::Mailto(MailtoTransport::new(recipient.clone()))
        }
    })
}
