use std::{ops::Deref, sync::LazyLock, time::Duration};

use anyhow::Context;
use athome_submit_contracts::TransportError;
use athome_utils::athome_version;
use reqwest::redirect;

pub static USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    let homepage = env!("CARGO_PKG_HOMEPAGE");
    let version = athome_version();

    format!("More@Home contact form ({homepage}, Version {version})")
});

const _: () = assert!(!env!("CARGO_PKG_HOMEPAGE").is_empty());

/// Timeout used if none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpClient(reqwest::Client);

impl Deref for HttpClient {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl HttpClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        Self::build(timeout, redirect::Policy::default())
    }

    /// Client that returns redirect responses instead of following them.
    pub fn without_redirects(timeout: Duration) -> anyhow::Result<Self> {
        Self::build(timeout, redirect::Policy::none())
    }

    fn build(timeout: Duration, redirect: redirect::Policy) -> anyhow::Result<Self> {
        reqwest::Client::builder()
            .user_agent(&*USER_AGENT)
            .timeout(timeout)
            .redirect(redirect)
            .build()
            .map(Self)
            .context("Failed to build http client")
    }
}

pub(crate) fn transport_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.into())
    }
}
