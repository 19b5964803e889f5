use std::sync::LazyLock;

use athome_models::session::SessionId;
use uuid::uuid;

pub static SESSION_1: LazyLock<SessionId> =
    LazyLock::new(|| uuid!("1943a975-8895-428d-9fb1-f8d450f29dae").into());
pub static SESSION_2: LazyLock<SessionId> =
    LazyLock::new(|| uuid!("b2b772de-4fc6-4651-9684-c71e70b9197b").into());
