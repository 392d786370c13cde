//! Scrape-parse-normalize-cache core for the AnimeFLV catalog.
//!
//! The pipeline: a rate-limited [`clients::AnimeFlvClient`] fetches HTML,
//! the [`scrape`] engine extracts and normalizes it into [`models`]
//! records, and the [`services`] layer wraps each query family in
//! cache-aside over a [`cache::CacheStore`] backend. The caller's
//! composition root constructs the client, the cache and the
//! [`services::AnimeFlv`] facade, injecting each dependency explicitly;
//! there is no process-wide singleton. Subscriber installation for
//! `tracing` likewise belongs to the caller.

pub mod cache;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod scrape;
pub mod services;

pub use cache::{CacheStore, MemoryCache};
pub use clients::{AnimeFlvClient, Scraper, VideoUrlResolver};
pub use config::Config;
pub use error::{Result, ScrapeError};
pub use services::AnimeFlv;

use std::sync::Arc;

/// Wires the default pipeline: an [`AnimeFlvClient`] over the configured
/// site plus an in-process [`MemoryCache`].
pub fn build(config: &Config) -> anyhow::Result<AnimeFlv> {
    config.validate()?;
    let scraper = Arc::new(AnimeFlvClient::new(config)?);
    let store = Arc::new(MemoryCache::new());
    Ok(AnimeFlv::new(scraper, store, config.cache.clone()))
}
