//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp type truncated to seconds
//! precision. Wire representations always render as ISO 8601 with `Z`
//! suffix (`YYYY-MM-DDTHH:MM:SSZ`), so two records with the same instant
//! always serialize identically regardless of where they were produced.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// Server-assigned on create and update; read-only to clients. `Ord` is
/// derived so timestamps can serve as sort keys and range-filter bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating
    /// sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 string, converting any offset
    /// to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::BadRequest`] when the string is not valid
    /// RFC 3339.
    pub fn parse(s: &str) -> Result<Self, RegistryError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            RegistryError::bad_request(format!("invalid timestamp {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO 8601 with Z suffix (e.g. `2012-05-16T15:27:36Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_iso8601_rendering() {
        let dt = Utc.with_ymd_and_hms(2012, 5, 16, 15, 27, 36).unwrap();
        let ts = Timestamp::from_utc(dt);
        assert_eq!(ts.to_iso8601(), "2012-05-16T15:27:36Z");
    }

    #[test]
    fn test_from_utc_truncates_microseconds() {
        let dt = Utc
            .with_ymd_and_hms(2012, 5, 16, 15, 27, 36)
            .unwrap()
            .with_nanosecond(325_355_000)
            .unwrap();
        let ts = Timestamp::from_utc(dt);
        assert_eq!(ts.to_iso8601(), "2012-05-16T15:27:36Z");
    }

    #[test]
    fn test_parse_converts_offset_to_utc() {
        let ts = Timestamp::parse("2012-05-16T20:27:36+05:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2012-05-16T15:27:36Z");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = Timestamp::parse("yesterday").unwrap_err();
        assert!(matches!(err, RegistryError::BadRequest(_)));
    }

    #[test]
    fn test_ordering() {
        let t1 = Timestamp::parse("2012-05-16T15:27:36Z").unwrap();
        let t2 = Timestamp::parse("2012-05-16T15:27:37Z").unwrap();
        assert!(t1 < t2);
    }
}
