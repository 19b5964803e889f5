use anyhow::{ensure, Context};
use athome_config::{Config, EmailTransportConfig};
use athome_email_contracts::{ContentType, Email, EmailService};
use athome_models::email_address::EmailAddressWithName;
use clap::Subcommand;
use tracing::info;

use crate::email;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Send a test email through the configured mail backend
    Test {
        /// Defaults to the recipient of contact form messages
        recipient: Option<EmailAddressWithName>,
    },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => {
                let recipient = recipient.unwrap_or_else(|| config.contact.recipient.clone());
                let email_service = email::connect(&config.email)?;
                let backend = backend_name(&config.email.transport);

                info!(%recipient, backend, "Sending test email");
                test(&email_service, recipient, backend).await
            }
        }
    }
}

fn backend_name(transport: &EmailTransportConfig) -> &'static str {
    match transport {
        EmailTransportConfig::Smtp { .. } => "smtp",
        EmailTransportConfig::Sendmail { .. } => "sendmail",
        EmailTransportConfig::Stub => "stub",
    }
}

async fn test(
    email_service: &impl EmailService,
    recipient: EmailAddressWithName,
    backend: &str,
) -> anyhow::Result<()> {
    let ok = email_service
        .send(Email {
            recipient,
            subject: "More@Home Contact Form - Test Email".into(),
            body: format!(
                "This is a test email from the More@Home contact form backend.\n\
                 Mail backend: {backend}\n\n\
                 If you can read this, contact form messages will reach this mailbox."
            ),
            content_type: ContentType::Text,
            reply_to: None,
        })
        .await
        .context("Failed to hand test email to mail backend")?;

    ensure!(ok, "The mail backend refused the test email");

    Ok(())
}
