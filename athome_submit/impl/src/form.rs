use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard, PoisonError,
};

use athome_models::contact::{
    validate, ContactField, ContactSubmission, FieldErrors, PhonePolicy,
};
use athome_submit_contracts::{SubmissionTransport, TransportError};
use thiserror::Error;
use tracing::{debug, info};

/// Values and validation errors of a contact form for one submission attempt.
#[derive(Debug)]
pub struct ContactForm<Transport> {
    transport: Transport,
    phone_policy: PhonePolicy,
    state: Mutex<FormState>,
    submitting: AtomicBool,
}

#[derive(Debug, Default)]
struct FormState {
    values: ContactSubmission,
    errors: FieldErrors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The transport accepted the submission. The form has been reset.
    Sent,
    /// The honeypot was filled in, nothing has been sent.
    Suppressed,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Please fill in all required fields correctly.")]
    Validation(FieldErrors),
    #[error("The message is already being sent.")]
    InProgress,
    #[error(transparent)]
    Delivery(#[from] TransportError),
}

impl<Transport> ContactForm<Transport>
where
    Transport: SubmissionTransport,
{
    pub fn new(transport: Transport, phone_policy: PhonePolicy) -> Self {
        Self {
            transport,
            phone_policy,
            state: Default::default(),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn values(&self) -> ContactSubmission {
        self.lock().values.clone()
    }

    pub fn errors(&self) -> FieldErrors {
        self.lock().errors.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Updates a single field and clears its validation error.
    pub fn set_field(&self, field: ContactField, value: impl Into<String>) {
        let mut state = self.lock();
        state.values.set(field, value.into());
        state.errors.clear(field);
    }

    /// Validates the current values and hands them to the transport.
    ///
    /// Only one submission can be in flight at a time. The form is reset
    /// after a successful delivery, on failure the values are kept so the
    /// user can try again.
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmitError> {
        let Some(_guard) = SubmittingGuard::acquire(&self.submitting) else {
            return Err(SubmitError::InProgress);
        };

        let values = self.lock().values.clone();

        if values.is_bot_suspected() {
            info!("Dropping contact form submission with filled in honeypot");
            return Ok(SubmitOutcome::Suppressed);
        }

        let errors = validate(&values, self.phone_policy);
        if !errors.is_empty() {
            debug!(?errors, "Contact form is invalid");
            self.lock().errors = errors.clone();
            return Err(SubmitError::Validation(errors));
        }

        self.transport.deliver(&values).await?;

        *self.lock() = FormState::default();

        Ok(SubmitOutcome::Sent)
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct SubmittingGuard<'a>(&'a AtomicBool);

impl<'a> SubmittingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
