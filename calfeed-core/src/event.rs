//! Event types shared by the parser, normalizer and writer.
//!
//! `EventTime` is what the ICS parser decoded for DTSTART/DTEND. It keeps
//! the original form (date, UTC, floating or zoned) so the normalizer can
//! reason about wall-clock time before everything is flattened to UTC.
//! `CalendarEvent` is the canonical record written to the JSON artifact.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::date_range::parse_timestamp;

/// A decoded DTSTART/DTEND value.
#[derive(Debug, Clone, PartialEq)]
pub enum EventTime {
    /// VALUE=DATE, no time of day
    Date(NaiveDate),
    DateTimeUtc(DateTime<Utc>),
    /// No zone information; interpreted in the run's timezone
    DateTimeFloating(NaiveDateTime),
    DateTimeZoned { datetime: NaiveDateTime, tzid: String },
    /// A value that could not be decoded, kept verbatim
    Text(String),
}

impl EventTime {
    /// Whether the wall-clock time is exactly 00:00:00.
    ///
    /// UTC values are read on the clock of `tz`, the run's zone. Zoned values
    /// are checked in their own zone, so a midnight event in America/Chicago
    /// counts whatever `tz` is.
    pub fn is_midnight(&self, tz: Tz) -> bool {
        fn zero<T: Timelike>(t: &T) -> bool {
            t.hour() == 0 && t.minute() == 0 && t.second() == 0
        }

        match self {
            EventTime::Date(_) => true,
            EventTime::DateTimeUtc(dt) => zero(&dt.with_timezone(&tz)),
            EventTime::DateTimeFloating(dt) => zero(dt),
            EventTime::DateTimeZoned { datetime, .. } => zero(datetime),
            EventTime::Text(_) => false,
        }
    }

    /// Resolve to an absolute instant. Dates and floating times are read in
    /// `tz`; unknown TZIDs fall back to `tz` as well.
    ///
    /// Returns None for undecoded text and for local times that don't exist
    /// (spring-forward gaps).
    pub fn to_utc(&self, tz: Tz) -> Option<DateTime<Utc>> {
        match self {
            EventTime::Date(date) => local_to_utc(date.and_hms_opt(0, 0, 0)?, tz),
            EventTime::DateTimeUtc(dt) => Some(*dt),
            EventTime::DateTimeFloating(naive) => local_to_utc(*naive, tz),
            EventTime::DateTimeZoned { datetime, tzid } => {
                let zone = parse_tzid(tzid).unwrap_or_else(|| {
                    log::debug!("Unknown TZID '{}', using {}", tzid, tz);
                    tz
                });
                local_to_utc(*datetime, zone)
            }
            EventTime::Text(_) => None,
        }
    }

    /// The string written to the artifact: an ISO-8601 instant with
    /// millisecond precision, or the raw value when there is no instant.
    pub fn to_output_string(&self, tz: Tz) -> String {
        match self.to_utc(tz) {
            Some(instant) => instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            None => self.to_string(),
        }
    }
}

impl std::fmt::Display for EventTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventTime::DateTimeUtc(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%SZ")),
            EventTime::DateTimeFloating(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            EventTime::DateTimeZoned { datetime, .. } => {
                write!(f, "{}", datetime.format("%Y-%m-%dT%H:%M:%S"))
            }
            EventTime::Text(s) => f.write_str(s),
        }
    }
}

fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Feeds quote TZIDs or prefix them with a slash (`TZID=/America/Chicago`).
fn parse_tzid(tzid: &str) -> Option<Tz> {
    tzid.trim_matches('"').trim_start_matches('/').parse().ok()
}

/// A normalized event as written to `events.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub title: String,
    pub start: String,
    pub end: String,
    pub all_day: bool,
    pub categories: Arc<[String]>,
    pub location: String,
    pub link: String,
    pub notes: String,
}

impl CalendarEvent {
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_date_renders_as_midnight_instant() {
        let time = EventTime::Date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(time.is_midnight(Tz::UTC));
        assert_eq!(time.to_output_string(Tz::UTC), "2025-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_date_in_run_timezone() {
        let time = EventTime::Date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(
            time.to_output_string(chrono_tz::America::Chicago),
            "2025-01-01T06:00:00.000Z"
        );
    }

    #[test]
    fn test_zoned_time_is_checked_in_its_own_zone() {
        let time = EventTime::DateTimeZoned {
            datetime: naive(2025, 3, 1, 0, 0, 0),
            tzid: "America/Chicago".to_string(),
        };
        assert!(time.is_midnight(Tz::UTC));
        assert_eq!(time.to_output_string(Tz::UTC), "2025-03-01T06:00:00.000Z");
    }

    #[test]
    fn test_utc_time_is_checked_on_the_run_clock() {
        let time = EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2025, 1, 1, 6, 0, 0).unwrap());
        assert!(time.is_midnight(chrono_tz::America::Chicago));
        assert!(!time.is_midnight(Tz::UTC));

        let time = EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assert!(!time.is_midnight(chrono_tz::America::Chicago));
    }

    #[test]
    fn test_unknown_tzid_falls_back_to_run_timezone() {
        let time = EventTime::DateTimeZoned {
            datetime: naive(2025, 3, 1, 9, 30, 0),
            tzid: "Central Standard Time".to_string(),
        };
        assert_eq!(time.to_output_string(Tz::UTC), "2025-03-01T09:30:00.000Z");
    }

    #[test]
    fn test_slash_prefixed_tzid() {
        let time = EventTime::DateTimeZoned {
            datetime: naive(2025, 7, 1, 12, 0, 0),
            tzid: "/Europe/Berlin".to_string(),
        };
        assert_eq!(time.to_output_string(Tz::UTC), "2025-07-01T10:00:00.000Z");
    }

    #[test]
    fn test_text_passes_through() {
        let time = EventTime::Text("TBA".to_string());
        assert!(!time.is_midnight(Tz::UTC));
        assert_eq!(time.to_utc(Tz::UTC), None);
        assert_eq!(time.to_output_string(Tz::UTC), "TBA");
    }

    #[test]
    fn test_nonexistent_local_time_passes_through_as_text() {
        // 02:30 does not exist in New York on 2025-03-09
        let time = EventTime::DateTimeZoned {
            datetime: naive(2025, 3, 9, 2, 30, 0),
            tzid: "America/New_York".to_string(),
        };
        assert_eq!(time.to_output_string(Tz::UTC), "2025-03-09T02:30:00");
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let event = CalendarEvent {
            title: "Concert".to_string(),
            start: "2025-06-01T10:00:00.000Z".to_string(),
            end: String::new(),
            all_day: false,
            categories: Arc::from(vec!["arts".to_string()]),
            location: String::new(),
            link: String::new(),
            notes: String::new(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Concert","start":"2025-06-01T10:00:00.000Z","end":"","allDay":false,"categories":["arts"],"location":"","link":"","notes":""}"#
        );
    }
}
