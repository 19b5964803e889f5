use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::{
    message::{
        ContactMessage, ContactMessageAuthor, ContactMessageContent, ContactName, ContactPhone,
        ContactValidationError,
    },
    validate::{validate, FieldError, FieldErrors, PhonePolicy},
};

mod message;
mod validate;

/// Raw values of a contact form, exactly as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    /// Hidden from humans. Anything in here marks the submission as automated.
    pub honeypot: String,
}

impl ContactSubmission {
    /// Trims and strips markup from all user visible fields.
    ///
    /// The honeypot is kept verbatim.
    pub fn sanitized(self) -> Self {
        Self {
            name: sanitize(&self.name),
            email: sanitize(&self.email),
            phone: sanitize(&self.phone),
            message: sanitize(&self.message),
            honeypot: self.honeypot,
        }
    }

    pub fn is_bot_suspected(&self) -> bool {
        !self.honeypot.is_empty()
    }

    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Message => &self.message,
            ContactField::Honeypot => &self.honeypot,
        }
    }

    pub fn set(&mut self, field: ContactField, value: String) {
        *match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
            ContactField::Message => &mut self.message,
            ContactField::Honeypot => &mut self.honeypot,
        } = value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Message,
    Honeypot,
}

impl ContactField {
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Message,
        Self::Honeypot,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Message => "message",
            Self::Honeypot => "honeypot",
        }
    }

    /// Human readable label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Phone => "Phone number",
            Self::Message => "Message",
            Self::Honeypot => "Honeypot",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown contact form field: {0:?}")]
pub struct UnknownContactField(pub String);

impl FromStr for ContactField {
    type Err = UnknownContactField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownContactField(s.into()))
    }
}

static MARKUP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^\s<>][^>]*(?:>|$)").unwrap());

fn sanitize(value: &str) -> String {
    MARKUP_REGEX.replace_all(value, "").trim().into()
}
