/// Time primitives
use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch, UTC.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Time(pub i64);

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

impl Time {
    pub fn from_millis(ms: i64) -> Self {
        Time(ms)
    }

    pub fn millis(self) -> i64 {
        self.0
    }

    /// Parses an ISO-8601 style timestamp.
    ///
    /// Accepted shapes: RFC 3339 with offset, date-time without offset
    /// (read as UTC), `YYYY-MM-DD`, `YYYY-MM` and `YYYY` (midnight UTC at the
    /// start of the period). Anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Time(dt.timestamp_millis()));
        }

        for fmt in NAIVE_DATE_TIME_FORMATS {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Time(ndt.and_utc().timestamp_millis()));
            }
        }

        let date = match s.len() {
            4 => NaiveDate::parse_from_str(&format!("{s}-01-01"), "%Y-%m-%d").ok(),
            7 => NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok(),
            _ => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
        }?;
        let midnight = date.and_hms_opt(0, 0, 0)?;
        Some(Time(midnight.and_utc().timestamp_millis()))
    }

    /// Numeric timestamps are epoch milliseconds.
    pub fn from_millis_f64(ms: f64) -> Option<Self> {
        if !ms.is_finite() {
            return None;
        }
        Some(Time(ms.round() as i64))
    }
}

/// A timestamp as written in the source data, plus its parsed value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub raw: String,
    pub time: Option<Time>,
}

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let time = Time::parse(&raw);
        Self { raw, time }
    }

    pub fn from_millis_f64(ms: f64) -> Self {
        Self {
            raw: ms.to_string(),
            time: Time::from_millis_f64(ms),
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.time.is_some()
    }
}

/// Ascending by parsed time; unparsable values sort after every parsed one.
pub fn chronological_cmp(a: Option<Time>, b: Option<Time>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
