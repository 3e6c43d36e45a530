// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and metric windows.

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Inclusive UTC bounds of a calendar day: [00:00:00, 23:59:59.999].
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap());
    let end = Utc.from_utc_datetime(&date.and_hms_milli_opt(23, 59, 59, 999).unwrap());
    (start, end)
}

/// Start of the trailing window of `days` days ending on `date` (inclusive).
/// A 7-day window ending on the 10th starts on the 4th.
pub fn window_start(date: NaiveDate, days: i64) -> DateTime<Utc> {
    let (start, _) = day_bounds(date - Duration::days(days - 1));
    start
}
