use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in seconds since epoch
pub fn current_timestamp_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}
