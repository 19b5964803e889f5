use anyhow::Context;
use athome_config::{EmailConfig, EmailTransportConfig};
use athome_email_impl::EmailServiceImpl;

/// Set up the configured mail backend
pub fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    let from = config.from.clone();
    match &config.transport {
        EmailTransportConfig::Smtp { url } => {
            EmailServiceImpl::smtp(url, from).context("Failed to set up SMTP transport")
        }
        EmailTransportConfig::Sendmail { command } => {
            Ok(EmailServiceImpl::sendmail(command.clone(), from))
        }
        EmailTransportConfig::Stub => Ok(EmailServiceImpl::stub(from)),
    }
}
