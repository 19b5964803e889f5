use nutype::nutype;
use thiserror::Error;

use super::{
    validate::{MESSAGE_MAX_LEN, NAME_MAX_LEN},
    ContactSubmission,
};
use crate::email_address::EmailAddress;

/// A contact message that passed the server side rules and is ready to be
/// delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub author: ContactMessageAuthor,
    pub phone: Option<ContactPhone>,
    pub content: ContactMessageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageAuthor {
    pub name: ContactName,
    pub email: EmailAddress,
}

#[nutype(
    sanitize(trim),
    validate(len_char_min = 2, len_char_max = NAME_MAX_LEN),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Display)
)]
pub struct ContactName(String);

#[nutype(sanitize(trim), derive(Debug, Clone, PartialEq, Eq, From, Deref, Display))]
pub struct ContactPhone(String);

#[nutype(
    sanitize(trim),
    validate(len_char_min = 10, len_char_max = MESSAGE_MAX_LEN),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Display)
)]
pub struct ContactMessageContent(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactValidationError {
    #[error("Name is required (minimum 2 characters)")]
    NameTooShort,
    #[error("Name is too long (maximum 100 characters)")]
    NameTooLong,
    #[error("Valid email is required")]
    InvalidEmail,
    #[error("Message is required (minimum 10 characters)")]
    MessageTooShort,
    #[error("Message is too long (maximum 1000 characters)")]
    MessageTooLong,
}

impl ContactMessage {
    /// Applies the server side rules to a (sanitized) submission.
    ///
    /// All failing rules are collected, not just the first one.
    pub fn try_from_submission(
        submission: &ContactSubmission,
    ) -> Result<Self, Vec<ContactValidationError>> {
        let mut errors = Vec::new();

        let name = ContactName::try_new(submission.name.clone())
            .map_err(|err| {
                errors.push(match err {
                    ContactNameError::LenCharMinViolated => ContactValidationError::NameTooShort,
                    ContactNameError::LenCharMaxViolated => ContactValidationError::NameTooLong,
                })
            })
            .ok();

        let email = submission
            .email
            .trim()
            .parse::<EmailAddress>()
            .map_err(|_| errors.push(ContactValidationError::InvalidEmail))
            .ok();

        let content = ContactMessageContent::try_new(submission.message.clone())
            .map_err(|err| {
                errors.push(match err {
                    ContactMessageContentError::LenCharMinViolated => {
                        ContactValidationError::MessageTooShort
                    }
                    ContactMessageContentError::LenCharMaxViolated => {
                        ContactValidationError::MessageTooLong
                    }
                })
            })
            .ok();

        match (name, email, content) {
            (Some(name), Some(email), Some(content)) => Ok(Self {
                author: ContactMessageAuthor { name, email },
                phone: Some(ContactPhone::new(submission.phone.clone()))
                    .filter(|phone| !phone.is_empty()),
                content,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Asha Menon".into(),
            email: "asha@example.com".into(),
            phone: "+91 9876543210".into(),
            message: "Please call me about weekend tutoring slots.".into(),
            honeypot: String::new(),
        }
    }

    #[test]
    fn ok() {
        // Act
        let result = ContactMessage::try_from_submission(&submission()).unwrap();

        // Assert
        assert_eq!(*result.author.name, "Asha Menon");
        assert_eq!(result.author.email.as_str(), "asha@example.com");
        assert_eq!(result.phone.as_deref().map(String::as_str), Some("+91 9876543210"));
        assert_eq!(
            *result.content,
            "Please call me about weekend tutoring slots."
        );
    }

    #[test]
    fn empty_phone_is_none() {
        let result = ContactMessage::try_from_submission(&ContactSubmission {
            phone: "  ".into(),
            ..submission()
        })
        .unwrap();
        assert_eq!(result.phone, None);
    }

    #[test]
    fn accumulates_all_errors() {
        // Act
        let result = ContactMessage::try_from_submission(&ContactSubmission {
            name: "A".into(),
            email: "not-an-email".into(),
            message: "Call me".into(),
            ..submission()
        });

        // Assert
        let errors = result.unwrap_err();
        assert_eq!(
            errors,
            [
                ContactValidationError::NameTooShort,
                ContactValidationError::InvalidEmail,
                ContactValidationError::MessageTooShort,
            ]
        );
        assert_eq!(
            errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
            [
                "Name is required (minimum 2 characters)",
                "Valid email is required",
                "Message is required (minimum 10 characters)",
            ]
        );
    }

    #[test]
    fn empty_fields() {
        let errors = ContactMessage::try_from_submission(&ContactSubmission::default())
            .unwrap_err();
        assert_eq!(
            errors,
            [
                ContactValidationError::NameTooShort,
                ContactValidationError::InvalidEmail,
                ContactValidationError::MessageTooShort,
            ]
        );
    }

    #[test]
    fn too_long() {
        let errors = ContactMessage::try_from_submission(&ContactSubmission {
            name: "x".repeat(NAME_MAX_LEN + 1),
            message: "x".repeat(MESSAGE_MAX_LEN + 1),
            ..submission()
        })
        .unwrap_err();
        assert_eq!(
            errors,
            [
                ContactValidationError::NameTooLong,
                ContactValidationError::MessageTooLong,
            ]
        );
        assert_eq!(
            errors[1].to_string(),
            "Message is too long (maximum 1000 characters)"
        );
    }
}
