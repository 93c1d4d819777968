/// Days before "now" that events are kept.
pub const DEFAULT_PAST_DAYS: i64 = 90;

/// Days after "now" that events are kept.
pub const DEFAULT_FUTURE_DAYS: i64 = 365;

/// Per-request fetch timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

pub const MAX_REDIRECTS: usize = 10;

pub const DEFAULT_OUTPUT_PATH: &str = "calendar/events.json";

pub const DEFAULT_CONFIG_FILE: &str = "calfeed.toml";

/// Title used when a feed omits SUMMARY.
pub const UNTITLED_EVENT: &str = "Untitled event";

/// Some municipal calendar hosts reject non-browser clients outright.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

pub const ACCEPT_CALENDAR: &str = "text/calendar, text/plain, */*";

pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
