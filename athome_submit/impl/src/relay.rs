use std::sync::Arc;

use anyhow::Context;
use athome_models::contact::ContactSubmission;
use athome_submit_contracts::{SubmissionTransport, TransportError};
use serde::Serialize;
use tracing::warn;
use url::Url;

use crate::http::{transport_error, HttpClient};

/// Posts the submission as a url encoded form to a hosted form relay.
///
/// The relay's ajax endpoint is tried first. If it cannot be reached or does
/// not answer with a success status, the same form is posted once to the
/// regular form endpoint, whose response is usually a redirect to a thank you
/// page.
#[derive(Debug, Clone)]
pub struct RelayTransport {
    client: HttpClient,
    form_client: HttpClient,
    ajax_url: Arc<Url>,
    form_url: Arc<Url>,
}

#[derive(Debug, Serialize)]
struct RelayForm<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    message: &'a str,
    honeypot: &'a str,
    #[serde(rename = "_replyto")]
    reply_to: &'a str,
    #[serde(rename = "_subject")]
    subject: String,
    #[serde(rename = "_captcha")]
    captcha: &'static str,
}

impl<'a> RelayForm<'a> {
    fn new(submission: &'a ContactSubmission) -> Self {
        Self {
            name: &submission.name,
            email: &submission.email,
            phone: Some(submission.phone.as_str())
                .filter(|phone| !phone.trim().is_empty())
                .unwrap_or("Not provided"),
            message: &submission.message,
            honeypot: &submission.honeypot,
            reply_to: &submission.email,
            subject: format!("Website Contact - {}", submission.name),
            captcha: "false",
        }
    }
}

impl RelayTransport {
    /// `form_client` must not follow redirects.
    pub fn new(
        client: HttpClient,
        form_client: HttpClient,
        relay_url: &Url,
        token: &str,
    ) -> anyhow::Result<Self> {
        let mut base = relay_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let ajax_url = base
            .join(&format!("ajax/{token}"))
            .context("Failed to build relay ajax url")?;
        let form_url = base
            .join(token)
            .context("Failed to build relay form url")?;

        Ok(Self {
            client,
            form_client,
            ajax_url: ajax_url.into(),
            form_url: form_url.into(),
        })
    }

    async fn post_form(
        &self,
        client: &HttpClient,
        url: &Url,
        form: &RelayForm<'_>,
    ) -> Result<reqwest::StatusCode, TransportError> {
        client
            .post(url.clone())
            .form(form)
            .send()
            .await
            .map(|response| response.status())
            .map_err(transport_error)
    }
}

impl SubmissionTransport for RelayTransport {
    #[tracing::instrument(skip_all, fields(ajax_url = %self.ajax_url))]
    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), TransportError> {
        let form = RelayForm::new(submission);

        match self.post_form(&self.client, &self.ajax_url, &form).await {
            Ok(status) if status.is_success() => return Ok(()),
            Ok(status) => warn!(%status, "Relay rejected ajax submission, falling back to form post"),
            Err(err) => warn!("Failed to reach relay ajax endpoint, falling back to form post: {err}"),
        }

        let status = self
            .post_form(&self.form_client, &self.form_url, &form)
            .await?;

        if status.is_success() || status.is_redirection() {
            Ok(())
        } else {
            Err(TransportError::Rejected {
                status: status.as_u16(),
                message: "The form relay did not accept the message. Please try again later."
                    .into(),
                errors: Vec::new(),
            })
        }
    }
}
