//! Feed parsing using the icalendar crate's parser.

use std::collections::HashMap;

use chrono::NaiveDate;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};

use crate::error::{FeedError, FeedResult};
use crate::event::EventTime;

/// A VEVENT's fields as they appear in the feed, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEvent {
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

/// One top-level component of a feed.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    Event(RawEvent),
    /// VTODO, VJOURNAL, VTIMEZONE, VFREEBUSY, ...
    Other { kind: String },
}

/// Parsed records keyed by UID, in feed order.
///
/// A later component with the same key replaces the earlier one but keeps
/// its position. Instance overrides (RECURRENCE-ID) get their own key.
#[derive(Debug, Default)]
pub struct ParsedCalendar {
    records: Vec<(String, RawRecord)>,
    index: HashMap<String, usize>,
}

impl ParsedCalendar {
    fn insert(&mut self, id: String, record: RawRecord) {
        match self.index.get(&id) {
            Some(&pos) => self.records[pos].1 = record,
            None => {
                self.index.insert(id.clone(), self.records.len());
                self.records.push((id, record));
            }
        }
    }

    pub fn records(&self) -> impl Iterator<Item = (&str, &RawRecord)> {
        self.records.iter().map(|(id, record)| (id.as_str(), record))
    }
}

/// Parse a complete feed body.
///
/// An empty body is an empty calendar, not an error.
pub fn parse_feed(content: &str) -> FeedResult<ParsedCalendar> {
    let mut parsed = ParsedCalendar::default();
    if content.trim().is_empty() {
        return Ok(parsed);
    }

    // Blocked or misrouted requests often come back as an HTML page with 200.
    if !content.to_ascii_uppercase().contains("BEGIN:VCALENDAR") {
        return Err(FeedError::IcsParse("missing BEGIN:VCALENDAR".to_string()));
    }

    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(FeedError::IcsParse)?;

    for (position, component) in calendar.components.iter().enumerate() {
        let kind = component.name.to_string().to_ascii_uppercase();
        let id = record_id(component, &kind, position);

        let record = if kind == "VEVENT" {
            RawRecord::Event(parse_vevent(component))
        } else {
            RawRecord::Other { kind }
        };

        parsed.insert(id, record);
    }

    Ok(parsed)
}

fn record_id(component: &Component, kind: &str, position: usize) -> String {
    let uid = component
        .find_prop("UID")
        .map(|p| p.val.to_string())
        .filter(|uid| !uid.trim().is_empty());

    match uid {
        Some(uid) => match component.find_prop("RECURRENCE-ID") {
            Some(rid) => format!("{}@{}", uid, rid.val.as_ref()),
            None => uid,
        },
        None => format!("{}-{}", kind.to_ascii_lowercase(), position),
    }
}

fn parse_vevent(vevent: &Component) -> RawEvent {
    RawEvent {
        start: vevent.find_prop("DTSTART").and_then(parse_time),
        end: vevent.find_prop("DTEND").and_then(parse_time),
        summary: text_prop(vevent, "SUMMARY"),
        location: text_prop(vevent, "LOCATION"),
        url: vevent
            .find_prop("URL")
            .map(|p| p.val.as_ref().trim().to_string())
            .filter(|s| !s.is_empty()),
        description: text_prop(vevent, "DESCRIPTION"),
    }
}

/// Decode DTSTART/DTEND. A bare `YYYYMMDD` without `VALUE=DATE` is still a
/// date; anything else the parser can't read is kept as text. Empty values
/// count as missing.
fn parse_time(prop: &Property) -> Option<EventTime> {
    let raw = prop.val.as_ref().trim();
    if raw.is_empty() {
        return None;
    }

    match DatePerhapsTime::try_from(prop) {
        Ok(dpt) => Some(to_event_time(dpt)),
        Err(_) => Some(
            NaiveDate::parse_from_str(raw, "%Y%m%d")
                .map(EventTime::Date)
                .unwrap_or_else(|_| EventTime::Text(raw.to_string())),
        ),
    }
}

fn to_event_time(dpt: DatePerhapsTime) -> EventTime {
    match dpt {
        DatePerhapsTime::Date(d) => EventTime::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => EventTime::DateTimeUtc(dt),
            CalendarDateTime::Floating(naive) => EventTime::DateTimeFloating(naive),
            CalendarDateTime::WithTimezone { date_time, tzid } => EventTime::DateTimeZoned {
                datetime: date_time,
                tzid,
            },
        },
    }
}

fn text_prop(component: &Component, name: &str) -> Option<String> {
    component
        .find_prop(name)
        .map(|p| unescape_text(p.val.as_ref()))
        .filter(|s| !s.is_empty())
}

/// Undo RFC 5545 TEXT escaping (`\n`, `\,`, `\;`, `\\`).
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}
