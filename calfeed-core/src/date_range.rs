//! Date range for windowing events.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use crate::error::{FeedError, FeedResult};
use crate::event::CalendarEvent;

/// Inclusive window `[from, to]` that an event's start must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// Errors when either bound falls outside what chrono can represent.
    pub fn around(now: DateTime<Utc>, past_days: i64, future_days: i64) -> FeedResult<Self> {
        let from = TimeDelta::try_days(past_days)
            .and_then(|delta| now.checked_sub_signed(delta))
            .ok_or_else(|| FeedError::Config(format!("past_days {past_days} is out of range")))?;
        let to = TimeDelta::try_days(future_days)
            .and_then(|delta| now.checked_add_signed(delta))
            .ok_or_else(|| {
                FeedError::Config(format!("future_days {future_days} is out of range"))
            })?;

        Ok(DateRange { from, to })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.from && instant <= self.to
    }

    /// Keep events whose start parses and falls inside the range.
    ///
    /// Must run on the merged output of all sources so every source is cut at
    /// the same instant.
    pub fn filter(&self, events: Vec<CalendarEvent>) -> Vec<CalendarEvent> {
        events
            .into_iter()
            .filter(|event| match event.start_instant() {
                Some(start) => self.contains(start),
                None => {
                    log::debug!("Dropping '{}': unparseable start '{}'", event.title, event.start);
                    false
                }
            })
            .collect()
    }
}

/// Parse an event `start`/`end` string back into an instant.
///
/// Accepts what the normalizer emits (RFC 3339) plus the bare date and
/// basic ICS forms that can pass through undecoded. Values without an offset
/// are read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y%m%dT%H%M%SZ", "%Y%m%dT%H%M%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn event_starting(start: &str) -> CalendarEvent {
        CalendarEvent {
            title: start.to_string(),
            start: start.to_string(),
            end: String::new(),
            all_day: false,
            categories: Arc::from(vec!["test".to_string()]),
            location: String::new(),
            link: String::new(),
            notes: String::new(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_around_builds_inclusive_bounds() {
        let range = DateRange::around(now(), 90, 365).unwrap();
        assert_eq!(range.from, Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap());
        assert_eq!(range.to, Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap());
        assert!(range.contains(range.from));
        assert!(range.contains(range.to));
        assert!(!range.contains(range.to + TimeDelta::seconds(1)));
    }

    #[test]
    fn test_huge_day_counts_are_config_errors() {
        for (past, future) in [(100_000_000, 365), (90, 100_000_000), (200_000_000_000, 365)] {
            let result = DateRange::around(now(), past, future);
            assert!(
                matches!(result, Err(FeedError::Config(_))),
                "past={past} future={future}: {result:?}"
            );
        }
    }

    #[test]
    fn test_filter_drops_out_of_window_and_unparseable_starts() {
        let range = DateRange::around(now(), 90, 365).unwrap();
        let events = vec![
            event_starting("2025-06-02T10:00:00.000Z"),
            event_starting("2024-01-01T10:00:00.000Z"),
            event_starting("2027-01-01T10:00:00.000Z"),
            event_starting("sometime next week"),
            event_starting("2025-07-04"),
        ];

        let kept: Vec<String> = range.filter(events).into_iter().map(|e| e.title).collect();
        assert_eq!(kept, vec!["2025-06-02T10:00:00.000Z", "2025-07-04"]);
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-01-01T00:00:00.000Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-01T01:00:00+01:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-01"), Some(expected));
        assert_eq!(parse_timestamp("20250101"), Some(expected));
        assert_eq!(parse_timestamp("20250101T000000Z"), Some(expected));
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("TBD"), None);
    }
}
