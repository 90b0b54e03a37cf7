//! Human-readable formatting of durations, timestamps and counts.

use chrono::{DateTime, Utc};

fn plural(n: i64, singular: &str, plural: &str) -> String {
    format!("{n} {}", if n == 1 { singular } else { plural })
}

/// Express a number of seconds in the largest sensible unit.
///
/// Only strictly more than an hour is shown in hours, and only strictly more
/// than a minute in minutes; the value is truncated, not rounded.
pub fn show_seconds_human(seconds: i64) -> String {
    if seconds > 3600 {
        plural(seconds / 3600, "hour", "hours")
    } else if seconds > 60 {
        plural(seconds / 60, "minute", "minutes")
    } else {
        plural(seconds, "second", "seconds")
    }
}

/// Format a past timestamp relative to `now` (e.g. "5 minutes ago").
///
/// Months count as 30 days and years as 365.  Anything under a second, or
/// in the future, is "just now".
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const WEEK: i64 = 7 * DAY;
    const MONTH: i64 = 30 * DAY;
    const YEAR: i64 = 365 * DAY;

    let seconds = now.signed_duration_since(then).num_seconds();
    let (n, singular, plural_form) = match seconds {
        s if s <= 0 => return "just now".to_string(),
        s if s < MINUTE => (s, "second", "seconds"),
        s if s < HOUR => (s / MINUTE, "minute", "minutes"),
        s if s < DAY => (s / HOUR, "hour", "hours"),
        s if s < WEEK => (s / DAY, "day", "days"),
        s if s < MONTH => (s / WEEK, "week", "weeks"),
        s if s < YEAR => (s / MONTH, "month", "months"),
        s => (s / YEAR, "year", "years"),
    };
    format!("{} ago", plural(n, singular, plural_form))
}

/// Group digits in thousands: `1234567` becomes `"1,234,567"`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
