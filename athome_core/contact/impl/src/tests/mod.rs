use std::sync::Arc;

use athome_core_contact_contracts::rate_limit::MockContactRateLimitService;
use athome_demo::RECIPIENT;
use athome_email_contracts::MockEmailService;
use athome_shared_contracts::time::MockTimeService;

use crate::{ContactFeatureConfig, ContactFeatureServiceImpl};


type Sut =
    ContactFeatureServiceImpl<MockTimeService, MockContactRateLimitService, MockEmailService>;

fn sut(
    time: MockTimeService,
    contact_rate_limit: MockContactRateLimitService,
    email: MockEmailService,
) -> Sut {
    ContactFeatureServiceImpl {
        time,
        contact_rate_limit,
        email,
        config: ContactFeatureConfig {
            recipient: Arc::new(RECIPIENT.clone()),
        },
    }
}
