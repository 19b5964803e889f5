use std::sync::LazyLock;

use athome_models::contact::ContactSubmission;

/// A valid submission with every field filled in.
pub static ASHA: LazyLock<ContactSubmission> = LazyLock::new(|| ContactSubmission {
    name: "Asha Menon".into(),
    email: "asha@example.com".into(),
    phone: "+91 9876543210".into(),
    message: "Please call me about weekend tutoring slots.".into(),
    honeypot: String::new(),
});

/// A valid submission without a phone number.
pub static RAVI: LazyLock<ContactSubmission> = LazyLock::new(|| ContactSubmission {
    name: "Ravi Kumar".into(),
    email: "ravi.kumar@example.org".into(),
    phone: String::new(),
    message: "Do you offer maths coaching for class 10 students?".into(),
    honeypot: String::new(),
});

/// Looks like a real message but has the honeypot filled in.
pub static SPAM: LazyLock<ContactSubmission> = LazyLock::new(|| ContactSubmission {
    name: "Cheap Pills".into(),
    email: "offers@spam.example".into(),
    phone: String::new(),
    message: "Best prices on the internet, click the link now!".into(),
    honeypot: "http://spam.example/".into(),
});
