//! Duration helpers for logged hours.
//!
//! Time entries store their duration as whole seconds.

const SECS_IN_HOUR: i64 = 60 * 60;

/// Working hours in one billable day.
pub const WORK_HOURS_IN_DAY: f64 = 8.0;

/// Convert a logged duration to billable work days.
pub fn as_work_days(duration_secs: i64) -> f64 {
    duration_secs as f64 / SECS_IN_HOUR as f64 / WORK_HOURS_IN_DAY
}

/// Format a duration as `H:MM`, or `H:MM:SS` when it has a seconds part or
/// `with_seconds` is set. Hours are not wrapped at 24.
pub fn as_human_str(duration_secs: i64, with_seconds: bool) -> String {
    let sign = if duration_secs < 0 { "-" } else { "" };
    let total = duration_secs.unsigned_abs();
    let hours = total / SECS_IN_HOUR as u64;
    let minutes = (total % SECS_IN_HOUR as u64) / 60;
    let seconds = total % 60;
    if with_seconds || seconds != 0 {
        format!("{sign}{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{sign}{hours}:{minutes:02}")
    }
}
