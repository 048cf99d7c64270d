//! # Time Utilities

use chrono::{DateTime, Duration, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// True once `issued_at + ttl` lies in the past.
pub fn is_expired(issued_at: DateTime<Utc>, ttl: Duration) -> bool {
    issued_at + ttl < now_utc()
}
