//! Timestamp formatting utilities
//!
//! Log headers carry a local-time datetime string of the form
//! `YYYY-MM-DD HH:MM:SS:millis`. Date and time components are zero-padded;
//! the millisecond component is not.

use chrono::{DateTime, Local, Timelike};

/// The datetime string for the current local time.
pub fn datetime_string() -> String {
    format_datetime(&Local::now())
}

/// Format a datetime as `YYYY-MM-DD HH:MM:SS:millis`.
pub fn format_datetime(datetime: &DateTime<Local>) -> String {
    format!(
        "{}:{}",
        datetime.format("%Y-%m-%d %H:%M:%S"),
        datetime.nanosecond() / 1_000_000
    )
}
