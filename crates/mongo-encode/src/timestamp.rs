//! Millisecond-precision UTC instants with an "invalid" sentinel.
//!
//! Parsing never fails. A string that no accepted form matches produces the
//! invalid timestamp, and all invalid timestamps compare equal to each other.
//!
//! Accepted forms:
//! - RFC 3339 / ISO 8601 with `Z` or a numeric offset (`2009-10-11T12:34:56.000Z`)
//! - date-time without offset (`2009-10-11T12:34:56`, `2009-10-11T12:34`), read as UTC
//! - `YYYY-MM-DD`, `YYYY-MM` and `YYYY`, read as UTC midnight
//! - RFC 2822 (`Sun, 11 Oct 2009 12:34:56 +0000`)
//!
//! Month and day are always two digits. Leap seconds (`:60`) and hour `24`
//! are rejected.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Timelike, Utc};

/// Largest representable distance from the epoch, in milliseconds (100 000 000 days).
pub const MAX_MILLIS: i64 = 8_640_000_000_000_000;

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A UTC instant in milliseconds since the Unix epoch, or the invalid sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp(Option<i64>);

impl Timestamp {
    /// The invalid sentinel.
    pub const INVALID: Timestamp = Timestamp(None);

    /// Values beyond [`MAX_MILLIS`], or outside the years chrono can
    /// represent, produce [`Timestamp::INVALID`].
    pub fn from_millis(ms: i64) -> Self {
        if (-MAX_MILLIS..=MAX_MILLIS).contains(&ms) && DateTime::<Utc>::from_timestamp_millis(ms).is_some() {
            Timestamp(Some(ms))
        } else {
            Self::INVALID
        }
    }

    /// Sub-millisecond precision is truncated.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self::from_millis(dt.timestamp_millis())
    }

    pub fn parse(s: &str) -> Self {
        match parse_to_utc(s.trim()) {
            Some(dt) => Self::from_datetime(dt),
            None => Self::INVALID,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub fn timestamp_millis(&self) -> Option<i64> {
        self.0
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        self.0.and_then(DateTime::<Utc>::from_timestamp_millis)
    }

    /// `YYYY-MM-DDTHH:MM:SS.mmmZ`, or `None` for the invalid sentinel.
    pub fn to_iso_string(&self) -> Option<String> {
        self.to_datetime()
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_iso_string() {
            Some(s) => f.write_str(&s),
            None => f.write_str("Invalid Date"),
        }
    }
}

fn parse_to_utc(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return (!is_leap_second(&dt)).then(|| dt.with_timezone(&Utc));
    }
    let naive = s.strip_suffix('Z').unwrap_or(s);
    if has_padded_date_prefix(naive) {
        for fmt in NAIVE_DATE_TIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
                return (!is_leap_second(&dt)).then(|| dt.and_utc());
            }
        }
    }
    if let Some(date) = parse_partial_date(naive) {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc2822(s)
        .ok()
        .filter(|dt| !is_leap_second(dt))
        .map(|dt| dt.with_timezone(&Utc))
}

/// chrono keeps a parsed `:60` as a nanosecond count past one second.
fn is_leap_second(t: &impl Timelike) -> bool {
    t.nanosecond() >= 1_000_000_000
}

/// `YYYY-MM-DD` followed by `T` or a space.
fn has_padded_date_prefix(s: &str) -> bool {
    matches!(s.as_bytes().get(10), Some(b'T' | b' '))
        && s.get(..10).and_then(parse_partial_date).is_some()
}

/// `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
fn parse_partial_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('-');
    let year = parse_fixed_digits(parts.next()?, 4)?;
    let month = match parts.next() {
        Some(p) => parse_fixed_digits(p, 2)?,
        None => 1,
    };
    let day = match parts.next() {
        Some(p) => parse_fixed_digits(p, 2)?,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

fn parse_fixed_digits(s: &str, len: usize) -> Option<u32> {
    if s.len() != len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
