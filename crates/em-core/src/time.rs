//! Trace time model.
//!
//! # Design
//!
//! A trace timestamp is either a decimal number of seconds (any epoch) or a
//! minute-precision date string.  Both are normalised to a `Timestamp`
//! holding seconds as `f64`, so every comparison and difference downstream
//! is format-agnostic:
//!
//! ```text
//! sec  : "1234.5"          → Timestamp(1234.5)
//! date : "03/14/09 15:26"  → Timestamp(seconds since 1970-01-01 00:00, zone-less)
//! ```
//!
//! Dates are parsed as naive date-times and read back as if they were UTC, so
//! differences are pure calendar arithmetic with no daylight-saving jumps.
//! Fields below the minute are never present in the pattern, which clears
//! them by construction.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::CoreError;

/// Simulation time and durations, in seconds.
pub type Seconds = f64;

/// `chrono` pattern for the `date` trace format (`MM/dd/yy HH:mm`).
pub const DATE_PATTERN: &str = "%m/%d/%y %H:%M";

// ── TimeFormat ────────────────────────────────────────────────────────────────

/// How the timestamp column of a trace is encoded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum TimeFormat {
    /// Decimal seconds.
    #[default]
    Seconds,
    /// `MM/dd/yy HH:mm`.
    Date,
}

impl TimeFormat {
    /// Parse a raw timestamp under this format.  Returns `None` when `raw`
    /// does not match; callers decide whether that is a config or data error.
    pub fn parse(self, raw: &str) -> Option<Timestamp> {
        let raw = raw.trim();
        match self {
            TimeFormat::Seconds => raw
                .parse::<f64>()
                .ok()
                .filter(|s| s.is_finite())
                .map(Timestamp),
            TimeFormat::Date => NaiveDateTime::parse_from_str(raw, DATE_PATTERN)
                .ok()
                .map(|dt| Timestamp(dt.and_utc().timestamp() as f64)),
        }
    }

    /// Settings tag for this format.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeFormat::Seconds => "sec",
            TimeFormat::Date    => "date",
        }
    }
}

impl FromStr for TimeFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("sec") {
            Ok(TimeFormat::Seconds)
        } else if s.eq_ignore_ascii_case("date") {
            Ok(TimeFormat::Date)
        } else {
            Err(CoreError::Config(format!(
                "time format {s:?} is not valid: expected \"date\" or \"sec\""
            )))
        }
    }
}

impl TryFrom<String> for TimeFormat {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Timestamp ─────────────────────────────────────────────────────────────────

/// An absolute trace time in seconds, already normalised from its text format.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Timestamp(pub f64);

impl Timestamp {
    /// Total order for sorting (parsed values are always finite).
    #[inline]
    pub fn total_cmp(&self, other: &Timestamp) -> Ordering {
        self.0.total_cmp(&other.0)
    }

    /// Seconds elapsed from `earlier` to `self` (negative if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: Timestamp) -> Seconds {
        self.0 - earlier.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
