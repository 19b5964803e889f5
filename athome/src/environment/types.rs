use athome_core_contact_impl::{rate_limit::ContactRateLimitServiceImpl, ContactFeatureServiceImpl};
use athome_core_health_impl::HealthFeatureServiceImpl;
use athome_email_impl::EmailServiceImpl;
use athome_shared_impl::time::TimeServiceImpl;

pub use crate::cache::Cache;

// API
pub type RestServer = athome_api_rest::RestServer<HealthFeature, ContactFeature>;

// Shared
pub type Time = TimeServiceImpl;
pub type Email = EmailServiceImpl;

// Core
pub type HealthFeature = HealthFeatureServiceImpl<Time, Cache, Email>;

pub type ContactFeature = ContactFeatureServiceImpl<Time, ContactRateLimit, Email>;
pub type ContactRateLimit = ContactRateLimitServiceImpl<Time, Cache>;
