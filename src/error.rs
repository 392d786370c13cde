//! Error taxonomy for the scrape pipeline.
//!
//! Transport failures, extraction failures, input validation and cache
//! faults are distinct variants so callers can tell "the site is down"
//! apart from "the markup changed under us".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network failure or request timeout from the HTTP client.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The origin answered with a non-2xx status. The body is discarded.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The document parsed cleanly but yielded no usable items, or a
    /// required field was absent. Distinguishes "markup changed / empty
    /// result" from "HTTP succeeded".
    #[error("no results found in document")]
    NoResults,

    /// Rejected before any I/O (empty search term, empty id).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Cache backend fault. The service layer never surfaces this to
    /// callers; reads degrade to a miss, writes are logged and dropped.
    #[error("cache error: {0}")]
    Cache(String),
}

impl ScrapeError {
    /// True for errors raised by validation, before any fetch happened.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
