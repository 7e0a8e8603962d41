//! Timestamp derivation.
//!
//! All calendar fields for a given event time are derived in one place, from
//! one `DateTime`, so fields can never disagree for the same `ts` (week and
//! year stay consistent across year boundaries).

use chrono::{DateTime, Datelike, Timelike};

/// Format of the `start_time` column.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Calendar fields derived from an event timestamp, in UTC.
///
/// Derivation is UTC throughout so output is identical regardless of the
/// host timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeParts {
    /// Formatted as `YYYY-MM-DD HH:MM:SS`.
    pub start_time: String,
    /// Hour of day, 0-23.
    pub hour: i32,
    /// Day of month, 1-31.
    pub day: i32,
    /// ISO week of year, 1-53.
    pub week: i32,
    /// Month of year, 1-12.
    pub month: i32,
    /// Four-digit year.
    pub year: i32,
    /// Day of week, 1 = Sunday through 7 = Saturday.
    pub weekday: i32,
}

impl TimeParts {
    /// Derive all fields from an epoch-millisecond timestamp.
    ///
    /// Returns `None` when the value is outside the representable range.
    pub fn from_epoch_ms(ts: i64) -> Option<Self> {
        let dt = DateTime::from_timestamp_millis(ts)?;

        Some(Self {
            start_time: dt.format(START_TIME_FORMAT).to_string(),
            hour: dt.hour() as i32,
            day: dt.day() as i32,
            week: dt.iso_week().week() as i32,
            month: dt.month() as i32,
            year: dt.year(),
            weekday: dt.weekday().number_from_sunday() as i32,
        })
    }
}
