use std::future::Future;

use athome_models::contact::ContactSubmission;
use thiserror::Error;

/// Strategy that hands a validated contact form submission over to its
/// destination.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait SubmissionTransport: Send + Sync + 'static {
    fn deliver(
        &self,
        submission: &ContactSubmission,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Could not reach the server. Please check your connection and try again.")]
    Network(#[source] anyhow::Error),
    #[error("The server did not respond in time. Please try again.")]
    Timeout,
    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
        errors: Vec<String>,
    },
    #[error("No way to deliver the message is available. Please contact us directly.")]
    MissingTarget,
}

#[cfg(feature = "mock")]
impl MockSubmissionTransport {
    pub fn with_deliver(
        mut self,
        submission: ContactSubmission,
        result: Result<(), TransportError>,
    ) -> Self {
        self.expect_deliver()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(|_| Box::pin(std::future::ready(result)));
        self
    }
}
