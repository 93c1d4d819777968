//! ICS feed parsing.
//!
//! Turns a whole feed into tagged records; see [`parse::RawRecord`].

mod parse;

pub use parse::{ParsedCalendar, RawEvent, RawRecord, parse_feed};
