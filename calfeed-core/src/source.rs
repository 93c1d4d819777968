//! Feed source descriptors and the built-in registry.

use std::sync::Arc;

use serde::Deserialize;

use crate::error::{FeedError, FeedResult};

/// One remote ICS feed and the tags applied to every event it produces.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedSource {
    pub url: String,
    pub categories: Arc<[String]>,
    #[serde(default)]
    pub name: String,
}

impl FeedSource {
    pub fn new(url: &str, categories: &[&str], name: &str) -> Self {
        FeedSource {
            url: url.to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            name: name.to_string(),
        }
    }

    /// Label used in diagnostics; falls back to the URL when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.url
        } else {
            &self.name
        }
    }

    /// URL to request. `webcal://` subscriptions are plain HTTPS underneath.
    pub fn fetch_url(&self) -> String {
        match self.url.strip_prefix("webcal://") {
            Some(rest) => format!("https://{rest}"),
            None => self.url.clone(),
        }
    }

    pub fn validate(&self) -> FeedResult<()> {
        if self.url.trim().is_empty() {
            return Err(FeedError::Config(format!(
                "Source '{}' has an empty url",
                self.name
            )));
        }

        url::Url::parse(&self.fetch_url()).map_err(|e| {
            FeedError::Config(format!("Source '{}' has an invalid url: {e}", self.display_name()))
        })?;

        if self.categories.is_empty() {
            return Err(FeedError::Config(format!(
                "Source '{}' must have at least one category",
                self.display_name()
            )));
        }

        Ok(())
    }
}

/// Feeds aggregated when no config file lists its own `[[sources]]`.
pub fn builtin_sources() -> Vec<FeedSource> {
    vec![
        FeedSource::new(
            "https://www.orangebeachboe.org/cf_calendar/feed.cfm?type=ical&feedID=6BA01E61A3DB4B68B54260AA97151E8F",
            &["school"],
            "Orange Beach Board of Education",
        ),
        FeedSource::new(
            "https://orangebeachal.gov/common/modules/iCalendar/iCalendar.aspx?feed=calendar&catID=23",
            &["arts"],
            "Art Center",
        ),
        FeedSource::new(
            "https://orangebeachal.gov/common/modules/iCalendar/iCalendar.aspx?feed=calendar&catID=34",
            &["community", "sports"],
            "Parks & Recreation",
        ),
        FeedSource::new(
            "https://orangebeachal.gov/common/modules/iCalendar/iCalendar.aspx?feed=calendar&catID=33",
            &["arts"],
            "Performing Arts Center",
        ),
    ]
}
