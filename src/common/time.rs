use crate::common::types::Timestamp;

/// Returns the time duration since UNIX_EPOCH in milliseconds.
pub fn current_time_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

/// Millisecond delta between two timestamps, in seconds. Used for
/// per-second rate conversion.
pub fn interval_seconds(prev: Timestamp, next: Timestamp) -> f64 {
    (next - prev) as f64 / 1000.0
}
