//! Wall-clock display helper.

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;

use time::OffsetDateTime;

/// Zero-padded `HH:MM:SS` for `at`, in whatever offset `at` carries.
#[must_use]
pub fn format_hms(at: OffsetDateTime) -> String {
    format!("{:02}:{:02}:{:02}", at.hour(), at.minute(), at.second())
}

/// Current time as `HH:MM:SS`. Local offset when the platform can report
/// one soundly, UTC otherwise.
#[must_use]
pub fn now_hms() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format_hms(now)
}
