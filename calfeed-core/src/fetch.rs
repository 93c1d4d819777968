//! Retrieval of raw feed text.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::redirect::Policy;

use crate::constants::{
    ACCEPT_CALENDAR, ACCEPT_LANGUAGE as ACCEPT_LANGUAGE_VALUE, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, MAX_REDIRECTS,
};
use crate::error::{FeedError, FeedResult};
use crate::source::FeedSource;

/// Something that can produce the raw ICS text for a source.
pub trait FeedFetcher {
    fn fetch(&self, source: &FeedSource) -> impl Future<Output = FeedResult<String>>;
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Fetches feeds over HTTP(S) with browser-like headers.
///
/// One attempt per call; no retries.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(settings: &FetchSettings) -> FeedResult<Self> {
        Self::from_builder(reqwest::Client::builder(), settings)
    }

    fn from_builder(builder: reqwest::ClientBuilder, settings: &FetchSettings) -> FeedResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_CALENDAR));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));

        let client = builder
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .timeout(settings.timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| FeedError::Config(format!("Could not create HTTP client: {e}")))?;

        Ok(HttpFetcher {
            client,
            timeout: settings.timeout,
        })
    }

    fn transport_error(&self, url: &str, err: reqwest::Error) -> FeedError {
        let reason = if err.is_timeout() {
            format!("timed out after {}s", self.timeout.as_secs())
        } else {
            err.to_string()
        };

        FeedError::Fetch {
            url: url.to_string(),
            reason,
        }
    }
}

impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, source: &FeedSource) -> FeedResult<String> {
        let url = source.fetch_url();
        log::info!("Fetching {} ({})", source.display_name(), url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::HttpStatus {
                url,
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| self.transport_error(&url, e))
    }
}
