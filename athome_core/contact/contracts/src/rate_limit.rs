use std::future::Future;

use athome_models::session::SessionId;
use thiserror::Error;

/// Minimum interval between two delivered messages of the same session.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactRateLimitService: Send + Sync + 'static {
    /// Fails if the last delivered message of the session is more recent than
    /// the cooldown.
    fn check(
        &self,
        session: SessionId,
    ) -> impl Future<Output = Result<(), ContactRateLimitError>> + Send;

    /// Remember that the session just delivered a message.
    fn record(&self, session: SessionId) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactRateLimitError {
    #[error("Rate limited.")]
    RateLimited,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactRateLimitService {
    pub fn with_check(mut self, session: SessionId, rate_limited: bool) -> Self {
        self.expect_check()
            .once()
            .with(mockall::predicate::eq(session))
            .return_once(move |_| {
                Box::pin(std::future::ready(if rate_limited {
                    Err(ContactRateLimitError::RateLimited)
                } else {
                    Ok(())
                }))
            });
        self
    }

    pub fn with_record(mut self, session: SessionId) -> Self {
        self.expect_record()
            .once()
            .with(mockall::predicate::eq(session))
            .return_once(|_| Box::pin(std::future::ready(Ok(()))));
        self
    }
}
