use athome_models::contact::ContactSubmission;
use athome_submit_contracts::{SubmissionTransport, TransportError};

pub use crate::{
    endpoint::EndpointTransport,
    form::{ContactForm, SubmitError, SubmitOutcome},
    http::HttpClient,
    mailto::MailtoTransport,
    relay::RelayTransport,
};

pub mod endpoint;
pub mod form;
pub mod http;
pub mod mailto;
pub mod relay;

/// The transport selected in the config.
#[derive(Debug, Clone)]
pub enum ConfiguredTransport {
    Endpoint(EndpointTransport),
    Relay(RelayTransport),
    Mailto(MailtoTransport),
}

impl SubmissionTransport for ConfiguredTransport {
    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), TransportError> {
        match self {
            Self::Endpoint(transport) => transport.deliver(submission).await,
            Self::Relay(transport) => transport.deliver(submission).await,
            Self::Mailto(transport) => transport.deliver(submission).await,
        }
    }
}
