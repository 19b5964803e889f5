use std::sync::Arc;

use athome_models::contact::ContactSubmission;
use athome_submit_contracts::{SubmissionTransport, TransportError};
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::http::{transport_error, HttpClient};

const FALLBACK_MESSAGE: &str = "Failed to send message. Please try again.";

/// Posts the submission as JSON to the first party contact endpoint.
#[derive(Debug, Clone)]
pub struct EndpointTransport {
    client: HttpClient,
    url: Arc<Url>,
}

#[derive(Debug, Deserialize)]
struct EndpointResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

impl EndpointTransport {
    pub fn new(client: HttpClient, url: Url) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl SubmissionTransport for EndpointTransport {
    #[tracing::instrument(skip_all, fields(url = %self.url))]
    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), TransportError> {
        let response = self
            .client
            .post((*self.url).clone())
            .json(submission)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = match response.json::<EndpointResponse>().await {
            Ok(body) => Some(body),
            Err(err) if err.is_timeout() => return Err(TransportError::Timeout),
            Err(err) => {
                warn!(%status, "Failed to parse response of contact endpoint: {err}");
                None
            }
        };

        match body {
            Some(body) if status.is_success() && body.success => Ok(()),
            body => {
                let (message, errors) = body
                    .map(|body| (body.message, body.errors))
                    .unwrap_or_default();
                Err(TransportError::Rejected {
                    status: status.as_u16(),
                    message: message.unwrap_or_else(|| FALLBACK_MESSAGE.into()),
                    errors,
                })
            }
        }
    }
}
