// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::{Date, DateTime, Time, Weekday};
use jiff::tz::TimeZone;
use jiff::ToSpan;

/// NOTE: Wire formats of the ERP API, keep them stable.
pub const WIRE_FORMAT_DATE: &str = "%Y-%m-%d";
pub const WIRE_FORMAT_TIME: &str = "%H:%M";

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    date.strftime(WIRE_FORMAT_DATE).to_string()
}

/// Formats a time of day as `HH:MM`.
#[must_use]
pub fn format_time(time: Time) -> String {
    time.strftime(WIRE_FORMAT_TIME).to_string()
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<Date, String> {
    Date::strptime(WIRE_FORMAT_DATE, s.trim()).map_err(|e| format!("Invalid date {s:?}: {e}"))
}

/// Parses a `HH:MM` time of day.
pub fn parse_time(s: &str) -> Result<Time, String> {
    Time::strptime(WIRE_FORMAT_TIME, s.trim()).map_err(|e| format!("Invalid time {s:?}: {e}"))
}

/// Seconds since the Unix epoch of a wall-clock date-time in the system time zone.
#[must_use]
pub fn unix_seconds(dt: DateTime) -> i64 {
    let tz = TimeZone::system();
    match dt.to_zoned(tz) {
        Ok(zoned) => zoned.timestamp().as_second(),
        Err(_) => dt
            .to_zoned(TimeZone::UTC)
            .map_or(0, |z| z.timestamp().as_second()),
    }
}

/// Adds a number of minutes, saturating at the limits of the civil range.
#[must_use]
pub fn add_minutes(dt: DateTime, minutes: i64) -> DateTime {
    dt.saturating_add(minutes.minutes())
}

/// Whole minutes from `start` to `end`, negative when `end` is earlier.
#[must_use]
pub fn minutes_between(start: DateTime, end: DateTime) -> i64 {
    start.duration_until(end).as_mins()
}

/// Human-readable duration, e.g. `1h30m`, `45m`, `2h`.
#[must_use]
pub fn format_minutes(minutes: i64) -> String {
    let (h, m) = (minutes / 60, minutes % 60);
    match (h, m) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h{m}m"),
    }
}

/// Monday to Sunday of the week containing `date`.
#[must_use]
pub fn week_of(date: Date) -> (Date, Date) {
    let offset = i64::from(date.weekday().to_monday_zero_offset());
    let monday = date.saturating_sub(offset.days());
    let sunday = monday.saturating_add(6.days());
    debug_assert_eq!(sunday.weekday(), Weekday::Sunday);
    (monday, sunday)
}
