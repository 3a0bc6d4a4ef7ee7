//! Parsing of the date strings carried by raw records.
//!
//! Services send a mix of RFC 3339 instants, naive local date-times and
//! bare dates. Everything is normalized to the local time zone, which is
//! what day bucketing is keyed on.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parse a service date string into a local instant.
/// Returns None if the string matches none of the accepted shapes.
pub fn parse_local(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return local_from_naive(naive);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| local_at(date, NaiveTime::MIN))
}

/// Anchor a wall-clock time to a date in the local time zone.
pub fn local_at(date: NaiveDate, time: NaiveTime) -> Option<DateTime<Local>> {
    local_from_naive(date.and_time(time))
}

/// Resolve a naive wall-clock value in the local zone.
/// Ambiguous times (DST fall-back) take the earlier instant; times inside a
/// DST gap are pushed forward by an hour.
pub fn local_from_naive(naive: NaiveDateTime) -> Option<DateTime<Local>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| Local.from_local_datetime(&(naive + Duration::hours(1))).earliest())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_bare_date_is_local_midnight() {
        let dt = parse_local("2024-03-10").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_naive_datetime_keeps_wall_clock() {
        let dt = parse_local("2024-03-15T23:00").unwrap();
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 23);

        let dt = parse_local("2024-03-15T09:30:00.000").unwrap();
        assert_eq!(dt.hour(), 9);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_rfc3339_round_trips_instant() {
        let dt = parse_local("2024-03-15T09:00:00Z").unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-03-15T09:00:00Z").unwrap();
        assert_eq!(dt, expected);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_local("").is_none());
        assert!(parse_local("next tuesday").is_none());
        assert!(parse_local("2024-13-40").is_none());
    }
}
