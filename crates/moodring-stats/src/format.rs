//! Elapsed-time formatting for report fields.

use chrono::Duration;

/// Format a duration as `"2h 15m"`, or `"15m"` under an hour.
///
/// Negative durations (clock skew) render as `"0m"`.
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    let hours = minutes / 60;
    let minutes = minutes % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
