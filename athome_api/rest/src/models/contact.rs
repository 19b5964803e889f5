use athome_models::contact::ContactSubmission;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of every response of the contact endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiContactResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ApiContactResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
        }
    }
}

/// Parses the raw request body of a contact form submission.
///
/// Only a non-empty JSON object is accepted. Missing and `null` fields are
/// treated as empty.
pub fn parse_submission(body: &[u8]) -> Option<ContactSubmission> {
    let object = serde_json::from_slice::<Map<String, Value>>(body).ok()?;
    if object.is_empty() {
        return None;
    }

    let RawSubmission {
        name,
        email,
        phone,
        message,
        honeypot,
    } = serde_json::from_value(Value::Object(object)).ok()?;

    Some(ContactSubmission {
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        phone: phone.unwrap_or_default(),
        message: message.unwrap_or_default(),
        honeypot: honeypot.unwrap_or_default(),
    })
}

#[derive(Deserialize)]
struct RawSubmission {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    honeypot: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_full_submission() {
        let body = br#"{
            "name": "Asha Menon",
            "email": "asha@example.com",
            "phone": "+91 9876543210",
            "message": "Please call me about weekend tutoring slots.",
            "honeypot": ""
        }"#;
        assert_eq!(
            parse_submission(body),
            Some(ContactSubmission {
                name: "Asha Menon".into(),
                email: "asha@example.com".into(),
                phone: "+91 9876543210".into(),
                message: "Please call me about weekend tutoring slots.".into(),
                honeypot: String::new(),
            })
        );
    }

    #[test]
    fn parse_invalid() {
        for body in [
            &b""[..],
            b"name=Asha",
            b"[\"Asha\", \"asha@example.com\"]",
            b"\"Asha\"",
            b"{\"name\": 42}",
            b"{}",
            b"null",
            b"{\"name\": \"Asha\"",
        ] {
            assert_eq!(
                parse_submission(body),
                None,
                "{}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn parse_null_fields() {
        assert_eq!(
            parse_submission(br#"{"name": "A", "honeypot": null}"#),
            Some(ContactSubmission {
                name: "A".into(),
                ..Default::default()
            })
        );
        assert_eq!(
            parse_submission(br#"{"phone": null}"#),
            Some(ContactSubmission::default())
        );
    }

    #[test]
    fn serialize_response() {
        assert_eq!(
            serde_json::to_value(ApiContactResponse::ok("Message sent")).unwrap(),
            serde_json::json!({"success": true, "message": "Message sent"})
        );
    }
}
