//! Writing the aggregated events to disk.

use std::path::Path;

use crate::error::{FeedError, FeedResult};
use crate::event::CalendarEvent;

/// Serialize events as a pretty-printed JSON array (2-space indent, no
/// trailing newline).
pub fn to_json(events: &[CalendarEvent]) -> FeedResult<String> {
    serde_json::to_string_pretty(events).map_err(|e| FeedError::Serialization(e.to_string()))
}

/// Write `events` to `path`, creating parent directories as needed.
///
/// An empty slice still produces a valid `[]` file.
pub fn write_events(path: &Path, events: &[CalendarEvent]) -> FeedResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let json = to_json(events)?;
    std::fs::write(path, json)?;
    log::info!("Wrote {} events to {}", events.len(), path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn event(title: &str) -> CalendarEvent {
        CalendarEvent {
            title: title.to_string(),
            start: "2025-01-01T00:00:00.000Z".to_string(),
            end: String::new(),
            all_day: true,
            categories: Arc::from(vec!["school".to_string()]),
            location: String::new(),
            link: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_write_creates_directories_and_pretty_prints() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendar").join("events.json");

        write_events(&path, &[event("Holiday")]).expect("Should write");

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            r#"[
  {
    "title": "Holiday",
    "start": "2025-01-01T00:00:00.000Z",
    "end": "",
    "allDay": true,
    "categories": [
      "school"
    ],
    "location": "",
    "link": "",
    "notes": ""
  }
]"#
        );
    }

    #[test]
    fn test_empty_collection_writes_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");

        write_events(&path, &[]).expect("Should write");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_written_file_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        let events = vec![event("One"), event("Two")];

        write_events(&path, &events).unwrap();

        let read: Vec<CalendarEvent> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read, events);
    }

    #[test]
    fn test_unwritable_location_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("calendar");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = write_events(&blocker.join("events.json"), &[]);

        assert!(matches!(result, Err(FeedError::Io(_))));
    }
}
