use std::{net::IpAddr, sync::Arc};

use anyhow::Context;
use athome_core_contact_contracts::{
    rate_limit::{ContactRateLimitError, ContactRateLimitService},
    ContactFeatureService, ContactSendMessageError, ContactSendOutcome,
};
use athome_email_contracts::{ContentType, Email, EmailService};
use athome_models::{
    contact::{ContactMessage, ContactSubmission},
    email_address::EmailAddressWithName,
    session::SessionId,
};
use athome_shared_contracts::time::TimeService;
use chrono::{DateTime, Utc};
use tracing::{error, info};

pub mod rate_limit;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<Time, ContactRateLimit, Email> {
    time: Time,
    contact_rate_limit: ContactRateLimit,
    email: Email,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    pub recipient: Arc<EmailAddressWithName>,
}

impl<Time, ContactRateLimit, EmailS> ContactFeatureServiceImpl<Time, ContactRateLimit, EmailS> {
    pub fn new(
        time: Time,
        contact_rate_limit: ContactRateLimit,
        email: EmailS,
        config: ContactFeatureConfig,
    ) -> Self {
        Self {
            time,
            contact_rate_limit,
            email,
            config,
        }
    }
}

impl<Time, ContactRateLimit, EmailS> ContactFeatureService
    for ContactFeatureServiceImpl<Time, ContactRateLimit, EmailS>
where
    Time: TimeService,
    ContactRateLimit: ContactRateLimitService,
    EmailS: EmailService,
{
    #[tracing::instrument(skip(self))]
    async fn check_cooldown(&self, session: SessionId) -> Result<(), ContactSendMessageError> {
        self.contact_rate_limit
            .check(session)
            .await
            .map_err(|err| match err {
                ContactRateLimitError::RateLimited => ContactSendMessageError::RateLimited,
                ContactRateLimitError::Other(err) => err
                    .context("Failed to check contact rate limit")
                    .into(),
            })
    }

    #[tracing::instrument(skip(self, submission))]
    async fn send_message(
        &self,
        session: SessionId,
        client_ip: IpAddr,
        submission: ContactSubmission,
    ) -> Result<ContactSendOutcome, ContactSendMessageError> {
        self.check_cooldown(session).await?;

        let submission = submission.sanitized();

        if submission.is_bot_suspected() {
            info!(
                target: "honeypot",
                %client_ip,
                %session,
                name = %submission.name,
                email = %submission.email,
                "Suppressed contact form submission with filled in honeypot"
            );
            return Ok(ContactSendOutcome::Suppressed);
        }

        let message = ContactMessage::try_from_submission(&submission)
            .map_err(ContactSendMessageError::Validation)?;

        let email = Email {
            recipient: (*self.config.recipient).clone(),
            subject: format!("Website Contact Form - {}", *message.author.name),
            body: compose_body(&message, self.time.now(), client_ip),
            content_type: ContentType::Text,
            reply_to: Some(
                message
                    .author
                    .email
                    .clone()
                    .with_name(message.author.name.clone().into_inner()),
            ),
        };

        if !self
            .email
            .send(email)
            .await
            .context("Failed to send contact message")?
        {
            return Err(ContactSendMessageError::Send);
        }

        if let Err(err) = self.contact_rate_limit.record(session).await {
            error!("Failed to record contact submission: {err:#}");
        }

        Ok(ContactSendOutcome::Delivered)
    }
}

fn compose_body(message: &ContactMessage, now: DateTime<Utc>, client_ip: IpAddr) -> String {
    let phone = message
        .phone
        .as_deref()
        .map(String::as_str)
        .unwrap_or("Not provided");

    format!(
        "New Contact Form Submission\n\
         ==========================\n\
         \n\
         Name: {name}\n\
         Email: {email}\n\
         Phone: {phone}\n\
         \n\
         Message:\n\
         --------\n\
         {content}\n\
         \n\
         ==========================\n\
         Submitted: {submitted}\n\
         IP Address: {client_ip}\n",
        name = *message.author.name,
        email = message.author.email,
        content = *message.content,
        submitted = now.format("%Y-%m-%d %H:%M:%S"),
    )
}
