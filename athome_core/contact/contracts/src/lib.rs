use std::{future::Future, net::IpAddr};

use athome_models::{
    contact::{ContactSubmission, ContactValidationError},
    session::SessionId,
};
use thiserror::Error;

pub mod rate_limit;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Fails with [`ContactSendMessageError::RateLimited`] if the session
    /// delivered a message within the cooldown period.
    ///
    /// Lets callers reject a request before looking at its payload.
    fn check_cooldown(
        &self,
        session: SessionId,
    ) -> impl Future<Output = Result<(), ContactSendMessageError>> + Send;

    /// Sanitizes, validates and delivers a contact form submission.
    fn send_message(
        &self,
        session: SessionId,
        client_ip: IpAddr,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<ContactSendOutcome, ContactSendMessageError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSendOutcome {
    /// The message was accepted by the mail backend.
    Delivered,
    /// The honeypot was filled in. Nothing has been sent.
    Suppressed,
}

#[derive(Debug, Error)]
pub enum ContactSendMessageError {
    #[error("Please wait before submitting again.")]
    RateLimited,
    #[error("Validation failed.")]
    Validation(Vec<ContactValidationError>),
    #[error("Failed to send message.")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_check_cooldown(mut self, session: SessionId, rate_limited: bool) -> Self {
        self.expect_check_cooldown()
            .once()
            .with(mockall::predicate::eq(session))
            .return_once(move |_| {
                Box::pin(std::future::ready(if rate_limited {
                    Err(ContactSendMessageError::RateLimited)
                } else {
                    Ok(())
                }))
            });
        self
    }

    pub fn with_send_message(
        mut self,
        session: SessionId,
        client_ip: IpAddr,
        submission: ContactSubmission,
        result: Result<ContactSendOutcome, ContactSendMessageError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(
                mockall::predicate::eq(session),
                mockall::predicate::eq(client_ip),
                mockall::predicate::eq(submission),
            )
            .return_once(|_, _, _| Box::pin(std::future::ready(result)));
        self
    }
}
