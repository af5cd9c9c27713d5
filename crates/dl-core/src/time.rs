//! Wall-clock representation used by the day log.
//!
//! Start times are local 24-hour `H:mm` / `HH:mm` strings, always written back
//! zero-padded. Dates are local ISO `YYYY-MM-DD` values and are never shifted
//! through UTC.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// Minutes in a calendar day; the end-of-day boundary for open intervals.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Format used for dates in storage, snapshots and the CLI.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a start time into its minute of day (0-1439).
///
/// Returns `None` for anything that is not a valid 24-hour `H:mm` / `HH:mm`
/// value. Read paths treat `None` as "not orderable" rather than as an error.
pub fn parse_start_time(text: &str) -> Option<u16> {
    let (hours, minutes) = text.trim().split_once(':')?;
    if !(1..=2).contains(&hours.len()) || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: u16 = hours.parse().ok()?;
    let minutes: u16 = minutes.parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Parses an ISO `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Formats a date as ISO `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Minute offset of a local wall-clock time within its day.
#[expect(
    clippy::cast_possible_truncation,
    reason = "hour * 60 + minute is always below 1440"
)]
pub fn minute_of_day(time: NaiveTime) -> u16 {
    (time.hour() * 60 + time.minute()) as u16
}

/// A validated start time, stored as minute of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StartTime(u16);

impl StartTime {
    /// Truncates a wall-clock time to minute precision.
    pub fn from_time(time: NaiveTime) -> Self {
        Self(minute_of_day(time))
    }

    /// Returns the minute of day.
    pub const fn minutes(self) -> u16 {
        self.0
    }
}

impl fmt::Display for StartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for StartTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_start_time(s)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidStartTime {
                value: s.to_string(),
            })
    }
}

impl Serialize for StartTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StartTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
