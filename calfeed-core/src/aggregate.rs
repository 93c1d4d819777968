//! Per-source pipeline, merge, window and sort.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::date_range::DateRange;
use crate::error::{FeedError, FeedResult};
use crate::event::CalendarEvent;
use crate::fetch::FeedFetcher;
use crate::normalize::normalize_feed;
use crate::source::FeedSource;

/// Run-level settings, fixed before the first fetch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarSettings {
    pub past_days: i64,
    pub future_days: i64,
    /// Zone for floating times and all-day dates
    pub timezone: Tz,
}

impl CalendarSettings {
    pub fn window(&self, now: DateTime<Utc>) -> FeedResult<DateRange> {
        DateRange::around(now, self.past_days, self.future_days)
    }
}

/// What happened to one source during a run.
#[derive(Debug)]
pub struct SourceOutcome {
    pub source: FeedSource,
    /// Number of events normalized from this source, before windowing
    pub result: FeedResult<usize>,
}

/// Result of a full run.
#[derive(Debug)]
pub struct Aggregation {
    /// Windowed and sorted events from every source that succeeded
    pub events: Vec<CalendarEvent>,
    /// One entry per configured source, in configuration order
    pub outcomes: Vec<SourceOutcome>,
}

impl Aggregation {
    pub fn succeeded(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&FeedSource, &FeedError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.source, e)))
    }
}

/// Hooks for reporting progress while sources are processed.
pub trait RunObserver {
    fn source_started(&mut self, _source: &FeedSource) {}
    fn source_finished(&mut self, _outcome: &SourceOutcome) {}
}

impl RunObserver for () {}

/// Fetch and normalize every source in turn, then window and sort the merged
/// events once.
///
/// A failing source is logged and recorded in `outcomes`; it never stops the
/// run. If every source fails the result is simply empty. The only error is a
/// window that can't be built, which is reported before anything is fetched.
pub async fn run<F: FeedFetcher>(
    fetcher: &F,
    sources: &[FeedSource],
    settings: &CalendarSettings,
    now: DateTime<Utc>,
) -> FeedResult<Aggregation> {
    run_observed(fetcher, sources, settings, now, &mut ()).await
}

pub async fn run_observed<F: FeedFetcher, O: RunObserver>(
    fetcher: &F,
    sources: &[FeedSource],
    settings: &CalendarSettings,
    now: DateTime<Utc>,
    observer: &mut O,
) -> FeedResult<Aggregation> {
    let window = settings.window(now)?;
    let mut all = Vec::new();
    let mut outcomes = Vec::with_capacity(sources.len());

    for source in sources {
        observer.source_started(source);

        let result = match collect_source(fetcher, source, settings.timezone).await {
            Ok(events) => {
                let count = events.len();
                all.extend(events);
                Ok(count)
            }
            Err(e) => {
                log::warn!("Source error: {} {}", source.display_name(), e);
                Err(e)
            }
        };

        let outcome = SourceOutcome {
            source: source.clone(),
            result,
        };
        observer.source_finished(&outcome);
        outcomes.push(outcome);
    }

    let mut events = window.filter(all);
    sort_chronologically(&mut events);

    Ok(Aggregation { events, outcomes })
}

async fn collect_source<F: FeedFetcher>(
    fetcher: &F,
    source: &FeedSource,
    tz: Tz,
) -> FeedResult<Vec<CalendarEvent>> {
    let content = fetcher.fetch(source).await?;
    normalize_feed(&content, &source.categories, tz)
}

/// Stable sort by parsed start. Events with the same start keep their
/// relative order.
pub fn sort_chronologically(events: &mut [CalendarEvent]) {
    events.sort_by_cached_key(|event| event.start_instant());
}

/// Number of events carrying each category.
pub fn category_counts(events: &[CalendarEvent]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for event in events {
        for category in event.categories.iter() {
            *counts.entry(category.as_str()).or_insert(0) += 1;
        }
    }
    counts
}
