use chrono::{DateTime, Utc};
use tokio::time::Instant;

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Monotonic clock; follows `tokio::time::pause` in tests.
pub fn get_instant() -> Instant {
    Instant::now()
}

pub fn chrono_seconds(seconds: u64) -> chrono::Duration {
    chrono::Duration::seconds(seconds.min(u32::MAX as u64) as i64)
}
