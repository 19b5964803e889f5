//! Fake third party services for tests and local development.

pub mod relay;
