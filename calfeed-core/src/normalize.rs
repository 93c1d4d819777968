//! Conversion of parsed feed records into canonical events.

use std::sync::Arc;

use chrono_tz::Tz;

use crate::constants::UNTITLED_EVENT;
use crate::error::FeedResult;
use crate::event::{CalendarEvent, EventTime};
use crate::ics::{RawEvent, RawRecord, parse_feed};

/// Parse one feed body and normalize every usable VEVENT in it.
///
/// Records that aren't events or have no DTSTART are skipped without error.
/// Every event shares `categories` by reference.
pub fn normalize_feed(
    content: &str,
    categories: &Arc<[String]>,
    tz: Tz,
) -> FeedResult<Vec<CalendarEvent>> {
    let calendar = parse_feed(content)?;

    let events = calendar
        .records()
        .filter_map(|(id, record)| match record {
            RawRecord::Event(raw) => normalize_event(id, raw, categories, tz),
            RawRecord::Other { kind } => {
                log::debug!("Skipping {kind} '{id}'");
                None
            }
        })
        .collect();

    Ok(events)
}

fn normalize_event(
    id: &str,
    raw: &RawEvent,
    categories: &Arc<[String]>,
    tz: Tz,
) -> Option<CalendarEvent> {
    let Some(start) = &raw.start else {
        log::debug!("Skipping VEVENT '{id}': no DTSTART");
        return None;
    };

    Some(CalendarEvent {
        title: raw
            .summary
            .clone()
            .unwrap_or_else(|| UNTITLED_EVENT.to_string()),
        start: start.to_output_string(tz),
        end: raw
            .end
            .as_ref()
            .map(|end| end.to_output_string(tz))
            .unwrap_or_default(),
        all_day: is_all_day(start, raw.end.as_ref(), tz),
        categories: Arc::clone(categories),
        location: raw.location.clone().unwrap_or_default(),
        link: raw.url.clone().unwrap_or_default(),
        notes: raw.description.clone().unwrap_or_default(),
    })
}

/// All-day heuristic: the start sits on midnight, and so does the end if
/// there is one.
///
/// This only looks at wall-clock times, with UTC values read in `tz`. A
/// `VALUE=DATE` start counts because it decodes to midnight, and a timed
/// event that happens to start at local 00:00:00 with no end is reported as
/// all-day too.
pub fn is_all_day(start: &EventTime, end: Option<&EventTime>, tz: Tz) -> bool {
    start.is_midnight(tz) && end.is_none_or(|end| end.is_midnight(tz))
}
