//! # Temporal Types: Validity Dates and Windows
//!
//! Defines `ValidityDate`, a calendar day on which a division record starts
//! or stops being authoritative, and `ValidityWindow`, the `from`/`to` pair
//! attached to every record.
//!
//! ## Accepted Shapes
//!
//! Historical sources are often only precise to the year, so three textual
//! shapes are accepted and normalized to a calendar day:
//!
//! - `YYYY-MM-DD`: the day itself.
//! - `YYYY-MM`: the first day of the month.
//! - `YYYY`: January 1 of the year (also accepted as a bare YAML integer).
//!
//! A YAML timestamp (`1838-01-01T00:00:00`, optionally with fractional
//! seconds or an RFC 3339 offset) is accepted as its date part.
//!
//! ## Open Bounds
//!
//! An absent `from` means the record has no known start; an absent `to`
//! means the record is still valid. Windows keep these as `None` and leave
//! the interpretation of open bounds to the caller's policy.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::DateError;

/// Timestamp layouts accepted besides RFC 3339.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// A calendar day bounding a validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidityDate(NaiveDate);

impl ValidityDate {
    /// Wrap a `chrono::NaiveDate`.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// January 1 of `year`.
    pub fn from_year(year: i32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, 1, 1)
            .map(Self)
            .ok_or_else(|| DateError::OutOfRange(year.to_string()))
    }

    /// Parse one of the accepted textual shapes.
    ///
    /// # Errors
    ///
    /// `DateError::Unrecognized` when the string has none of the accepted
    /// shapes, `DateError::OutOfRange` when it names a day that does not
    /// exist (e.g. `1900-02-30`).
    pub fn parse(s: &str) -> Result<Self, DateError> {
        let trimmed = s.trim();
        if trimmed.contains(['T', ' ']) {
            return Self::parse_timestamp(trimmed);
        }
        let parts: Vec<&str> = trimmed.split('-').collect();
        let numeric = |p: &str, len: usize| p.len() == len && p.bytes().all(|b| b.is_ascii_digit());

        let (year, month, day) = match *parts.as_slice() {
            [y] if numeric(y, 4) => (y, "1", "1"),
            [y, m] if numeric(y, 4) && numeric(m, 2) => (y, m, "1"),
            [y, m, d] if numeric(y, 4) && numeric(m, 2) && numeric(d, 2) => (y, m, d),
            _ => return Err(DateError::Unrecognized(trimmed.to_string())),
        };

        let unrecognized = || DateError::Unrecognized(trimmed.to_string());
        let year: i32 = year.parse().map_err(|_| unrecognized())?;
        let month: u32 = month.parse().map_err(|_| unrecognized())?;
        let day: u32 = day.parse().map_err(|_| unrecognized())?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| DateError::OutOfRange(trimmed.to_string()))
    }

    /// Date part of a timestamp, in the offset it was written with.
    fn parse_timestamp(s: &str) -> Result<Self, DateError> {
        if let Ok(stamp) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(stamp.date_naive()));
        }
        TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .map(|stamp| Self(stamp.date()))
            .ok_or_else(|| DateError::Unrecognized(s.to_string()))
    }

    /// Calendar year of the date.
    pub fn year(&self) -> i32 {
        self.0.year()
    }
}

impl std::fmt::Display for ValidityDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// The `from`/`to` validity window of a division record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidityWindow {
    /// First day the record is authoritative; `None` when unknown.
    pub from: Option<ValidityDate>,
    /// Last day the record is authoritative; `None` while still valid.
    pub to: Option<ValidityDate>,
}

impl ValidityWindow {
    /// Build a window from optional bounds.
    pub fn new(from: Option<ValidityDate>, to: Option<ValidityDate>) -> Self {
        Self { from, to }
    }

    /// True when both bounds are present and `from` is after `to`.
    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }
}

impl std::fmt::Display for ValidityWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.from {
            Some(from) => write!(f, "{from}")?,
            None => f.write_str("(open)")?,
        }
        f.write_str(" to ")?;
        match self.to {
            Some(to) => write!(f, "{to}"),
            None => f.write_str("(open)"),
        }
    }
}
