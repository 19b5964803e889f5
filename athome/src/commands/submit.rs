use anyhow::anyhow;
use athome_config::Config;
use athome_models::contact::{ContactField, PhonePolicy};
use athome_submit_contracts::SubmissionTransport;
use athome_submit_impl::{ContactForm, SubmitError, SubmitOutcome};
use clap::Args;

use crate::environment;

#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// Your name
    #[arg(long)]
    pub name: String,
    /// Your email address
    #[arg(long)]
    pub email: String,
    /// Your phone number
    #[arg(long, default_value = "")]
    pub phone: String,
    /// The message to send
    #[arg(long)]
    pub message: String,
}

impl SubmitCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        let transport = environment::submit_transport(&config.submit)?;

        match self.submit(transport, config.contact.phone).await? {
            SubmitOutcome::Sent => println!("Thank you! Your message has been sent."),
            SubmitOutcome::Suppressed => println!("Nothing has been sent."),
        }

        Ok(())
    }

    async fn submit(
        self,
        transport: impl SubmissionTransport,
        phone_policy: PhonePolicy,
    ) -> anyhow::Result<SubmitOutcome> {
        let form = ContactForm::new(transport, phone_policy);
        form.set_field(ContactField::Name, self.name);
        form.set_field(ContactField::Email, self.email);
        form.set_field(ContactField::Phone, self.phone);
        form.set_field(ContactField::Message, self.message);

        form.submit().await.map_err(|err| match err {
            SubmitError::Validation(ref errors) => {
                let details = errors
                    .iter()
                    .map(|(field, err)| format!("\n  {field}: {err}"))
                    .collect::<String>();
                anyhow!("{err}{details}")
            }
            err => err.into(),
        })
    }
}
