//! Fixed-point date values
//!
//! A `Timestamp` is whole seconds plus nanoseconds since the reference epoch
//! 2001-01-01T00:00:00Z. `nanoseconds` is always in `0..1_000_000_000`, so two
//! timestamps are equal exactly when they denote the same instant.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Seconds between 1970-01-01 and 2001-01-01
pub const REFERENCE_EPOCH_UNIX_SECONDS: i64 = 978_307_200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    seconds: i64,
    nanoseconds: u32,
}

impl Timestamp {
    /// The reference epoch itself
    pub const REFERENCE: Timestamp = Timestamp {
        seconds: 0,
        nanoseconds: 0,
    };

    /// Creates a timestamp, carrying excess nanoseconds into seconds.
    ///
    /// Seconds saturate at `i64::MAX`.
    pub fn new(seconds: i64, nanoseconds: u32) -> Self {
        let carry = i64::from(nanoseconds) / NANOS_PER_SECOND;
        Self {
            seconds: seconds.saturating_add(carry),
            nanoseconds: (i64::from(nanoseconds) % NANOS_PER_SECOND) as u32,
        }
    }

    /// From fractional seconds since the reference epoch, rounded to the
    /// nearest nanosecond.
    pub fn from_reference_seconds(interval: f64) -> Self {
        let total_nanos = (interval * NANOS_PER_SECOND as f64).round() as i128;
        let seconds = total_nanos.div_euclid(NANOS_PER_SECOND as i128) as i64;
        let nanoseconds = total_nanos.rem_euclid(NANOS_PER_SECOND as i128) as u32;
        Self {
            seconds,
            nanoseconds,
        }
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanoseconds(&self) -> u32 {
        self.nanoseconds
    }

    /// Fractional seconds since the reference epoch
    pub fn as_reference_seconds(&self) -> f64 {
        self.seconds as f64 + f64::from(self.nanoseconds) / NANOS_PER_SECOND as f64
    }

    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self {
            seconds: datetime.timestamp() - REFERENCE_EPOCH_UNIX_SECONDS,
            nanoseconds: datetime.timestamp_subsec_nanos(),
        }
    }

    /// Converts to a chrono datetime; `None` if outside chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let unix = self.seconds.checked_add(REFERENCE_EPOCH_UNIX_SECONDS)?;
        Utc.timestamp_opt(unix, self.nanoseconds).single()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Timestamp::from_datetime(datetime)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(datetime) => write!(f, "{}", datetime.to_rfc3339()),
            None => write!(f, "{}.{:09}s", self.seconds, self.nanoseconds),
        }
    }
}
