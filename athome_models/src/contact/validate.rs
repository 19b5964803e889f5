use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ContactField, ContactSubmission};

pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 255;
pub const MESSAGE_MAX_LEN: usize = 1000;

static EMAIL_SHAPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static REQUIRED_PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s-]{10,}$").unwrap());
static OPTIONAL_PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s()-]+$").unwrap());

/// Whether the phone number field has to be filled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhonePolicy {
    /// Phone is mandatory: optional leading `+`, then at least 10 digits,
    /// spaces or hyphens.
    Required,
    /// Phone may be left empty. If present it may only contain digits,
    /// spaces, hyphens, parentheses and a leading `+`.
    #[default]
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{} is required", .0.label())]
    Required(ContactField),
    #[error("{} must be at most {max} characters", .field.label())]
    TooLong { field: ContactField, max: usize },
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Invalid phone number")]
    InvalidPhone,
}

/// Validation result of a [`ContactSubmission`], at most one error per field.
///
/// The honeypot never has an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<FieldError>,
    pub email: Option<FieldError>,
    pub phone: Option<FieldError>,
    pub message: Option<FieldError>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn get(&self, field: ContactField) -> Option<FieldError> {
        match field {
            ContactField::Name => self.name,
            ContactField::Email => self.email,
            ContactField::Phone => self.phone,
            ContactField::Message => self.message,
            ContactField::Honeypot => None,
        }
    }

    pub fn clear(&mut self, field: ContactField) {
        match field {
            ContactField::Name => self.name = None,
            ContactField::Email => self.email = None,
            ContactField::Phone => self.phone = None,
            ContactField::Message => self.message = None,
            ContactField::Honeypot => {}
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContactField, FieldError)> + '_ {
        ContactField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|err| (field, err)))
    }
}

/// Checks every field of a submission and returns the errors found.
pub fn validate(submission: &ContactSubmission, phone_policy: PhonePolicy) -> FieldErrors {
    FieldErrors {
        name: validate_text(ContactField::Name, &submission.name, NAME_MAX_LEN),
        email: validate_email(&submission.email),
        phone: validate_phone(&submission.phone, phone_policy),
        message: validate_text(ContactField::Message, &submission.message, MESSAGE_MAX_LEN),
    }
}

fn validate_text(field: ContactField, value: &str, max: usize) -> Option<FieldError> {
    let value = value.trim();
    if value.is_empty() {
        Some(FieldError::Required(field))
    } else if value.chars().count() > max {
        Some(FieldError::TooLong { field, max })
    } else {
        None
    }
}

fn validate_email(value: &str) -> Option<FieldError> {
    if value.trim().is_empty() {
        Some(FieldError::Required(ContactField::Email))
    } else if !EMAIL_SHAPE_REGEX.is_match(value) {
        Some(FieldError::InvalidEmail)
    } else if value.chars().count() > EMAIL_MAX_LEN {
        Some(FieldError::TooLong {
            field: ContactField::Email,
            max: EMAIL_MAX_LEN,
        })
    } else {
        None
    }
}

fn validate_phone(value: &str, policy: PhonePolicy) -> Option<FieldError> {
    let empty = value.trim().is_empty();
    match policy {
        PhonePolicy::Required if empty => Some(FieldError::Required(ContactField::Phone)),
        PhonePolicy::Required => {
            (!REQUIRED_PHONE_REGEX.is_match(value)).then_some(FieldError::InvalidPhone)
        }
        PhonePolicy::Optional if empty => None,
        PhonePolicy::Optional => {
            let value = value.trim();
            let valid = OPTIONAL_PHONE_REGEX.is_match(value)
                && value.chars().any(|c| c.is_ascii_digit());
            (!valid).then_some(FieldError::InvalidPhone)
        }
    }
}
