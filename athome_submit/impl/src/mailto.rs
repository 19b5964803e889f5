use std::{path::PathBuf, process::Stdio, sync::Arc};

use athome_models::{contact::ContactSubmission, email_address::EmailAddress};
use athome_submit_contracts::{SubmissionTransport, TransportError};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tokio::process::Command;
use tracing::{debug, error};

/// Characters kept verbatim in `mailto:` query values.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Hands the submission over to the mail client registered with the
/// operating system.
///
/// Whether the message is actually sent is out of sight: success only means
/// that the mail client could be opened.
#[derive(Debug, Clone)]
pub struct MailtoTransport {
    recipient: Arc<EmailAddress>,
    opener: Arc<Opener>,
}

#[derive(Debug)]
struct Opener {
    program: PathBuf,
    args: Vec<String>,
}

impl MailtoTransport {
    pub fn new(recipient: EmailAddress) -> Self {
        let (program, args) = if cfg!(target_os = "windows") {
            ("cmd", vec!["/C".into(), "start".into(), String::new()])
        } else if cfg!(target_os = "macos") {
            ("open", Vec::new())
        } else {
            ("xdg-open", Vec::new())
        };

        Self::with_opener(recipient, program, args)
    }

    /// Uses `program` followed by `args` and the uri to open the mail client.
    pub fn with_opener(
        recipient: EmailAddress,
        program: impl Into<PathBuf>,
        args: Vec<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            opener: Opener {
                program: program.into(),
                args,
            }
            .into(),
        }
    }

    pub fn uri(&self, submission: &ContactSubmission) -> String {
        mailto_uri(&self.recipient, submission)
    }
}

impl SubmissionTransport for MailtoTransport {
    #[tracing::instrument(skip_all, fields(program = ?self.opener.program))]
    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), TransportError> {
        let uri = self.uri(submission);

        let status = Command::new(&self.opener.program)
            .args(&self.opener.args)
            .arg(&uri)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|err| {
                error!("Failed to start mail client opener: {err}");
                TransportError::MissingTarget
            })?;

        if !status.success() {
            error!(%status, "Mail client opener failed");
            return Err(TransportError::MissingTarget);
        }

        debug!("Opened mail client");
        Ok(())
    }
}

/// Builds a `mailto:` uri with subject and body prefilled from the
/// submission.
pub fn mailto_uri(recipient: &EmailAddress, submission: &ContactSubmission) -> String {
    let phone = Some(submission.phone.trim())
        .filter(|phone| !phone.is_empty())
        .unwrap_or("Not provided");

    let subject = format!("Website Contact - {}", submission.name);
    let body = format!(
        "Name: {}\nEmail: {}\nPhone: {phone}\n\nMessage:\n{}",
        submission.name, submission.email, submission.message
    );

    format!(
        "mailto:{recipient}?subject={}&body={}",
        utf8_percent_encode(&subject, QUERY_VALUE),
        utf8_percent_encode(&body, QUERY_VALUE),
    )
}
