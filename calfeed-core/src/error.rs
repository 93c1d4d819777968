//! Error types for calfeed.

use thiserror::Error;

/// Errors that can occur while building the aggregated calendar.
///
/// `Fetch`, `HttpStatus` and `IcsParse` are scoped to a single source and are
/// recovered by the orchestrator. `Config`, `Io` and `Serialization` end the run.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch failed {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Fetch failed {url}: {status} {reason}")]
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for calfeed operations.
pub type FeedResult<T> = Result<T, FeedError>;
