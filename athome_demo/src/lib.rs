use std::{
    net::{IpAddr, Ipv4Addr},
    sync::LazyLock,
};

use athome_models::email_address::EmailAddressWithName;
use chrono::{DateTime, TimeZone, Utc};
use uuid::{uuid, Uuid};

pub mod contact;
pub mod session;

pub const UUID1: Uuid = uuid!("eb1cd87a-4475-4d68-a2c2-0216bdaac8f7");

pub const CLIENT_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 42));

/// 2024-11-05 09:30:00 UTC
pub static NOW: LazyLock<DateTime<Utc>> =
    LazyLock::new(|| Utc.with_ymd_and_hms(2024, 11, 5, 9, 30, 0).unwrap());

pub static RECIPIENT: LazyLock<EmailAddressWithName> =
    LazyLock::new(|| "\"More@Home\" <info@moreathome.in>".parse().unwrap());
