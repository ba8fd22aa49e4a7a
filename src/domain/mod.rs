//! Domain rules that do not depend on storage or HTTP.
//!
//! Timestamps are kept as RFC 3339 strings with millisecond precision and a
//! `Z` suffix. The fixed width means lexical order in the database matches
//! chronological order, so `ORDER BY` and `MAX()` work on the raw column.

pub mod lockout;
pub mod slug;

use chrono::{DateTime, SecondsFormat, Utc};

/// Formats an instant the way every timestamp column stores it.
#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[must_use]
pub fn now_timestamp() -> String {
    timestamp(Utc::now())
}

/// Parses a stored timestamp. Values written by other collaborators may carry
/// an offset; they are normalized to UTC.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Rewrites a caller-supplied timestamp into the stored form, so values with
/// an offset still sort correctly next to everything else.
#[must_use]
pub fn normalize_timestamp(value: &str) -> Option<String> {
    parse_timestamp(value).map(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_has_fixed_width() {
        let a = timestamp(Utc.with_ymd_and_hms(2026, 3, 1, 9, 5, 0).unwrap());
        let b = timestamp(Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap());
        assert_eq!(a, "2026-03-01T09:05:00.000Z");
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }

    #[test]
    fn parse_accepts_offsets() {
        let parsed = parse_timestamp("2026-03-01T10:00:00+01:00").unwrap();
        assert_eq!(timestamp(parsed), "2026-03-01T09:00:00.000Z");
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn normalize_rewrites_offsets_to_utc_millis() {
        assert_eq!(
            normalize_timestamp("2026-03-05T09:30:00+01:00").as_deref(),
            Some("2026-03-05T08:30:00.000Z")
        );
        assert_eq!(
            normalize_timestamp("2026-03-05T08:30:00.000Z").as_deref(),
            Some("2026-03-05T08:30:00.000Z")
        );
        assert!(normalize_timestamp("2026-03-05").is_none());
    }
}
