//! Core of calfeed: aggregate several public ICS feeds into one JSON event list.
//!
//! The pipeline runs per source (fetch, parse, normalize) and then once over
//! the merged result (window, sort, write):
//! - `source` and `config` describe what to fetch
//! - `fetch` retrieves raw feed text
//! - `ics` and `normalize` turn feed text into [`CalendarEvent`]s
//! - `aggregate` drives the run and isolates per-source failures
//! - `output` writes the artifact

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod date_range;
pub mod error;
pub mod event;
pub mod fetch;
pub mod ics;
pub mod normalize;
pub mod output;
pub mod source;

pub use aggregate::{Aggregation, CalendarSettings, SourceOutcome};
pub use error::{FeedError, FeedResult};
pub use event::{CalendarEvent, EventTime};
pub use source::FeedSource;
