pub mod contact;
pub mod email_address;
mod macros;
pub mod session;
