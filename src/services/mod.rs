//! Cache-aside service layer: one service per query family.
//!
//! Every operation follows the same shape: validate inputs before any
//! I/O, normalize them, derive a deterministic cache key, try the cache,
//! and only on a miss run the full fetch-parse-normalize pass before
//! writing the result back under the family's TTL. Cache faults never
//! fail a request: a read failure is a miss, a write failure is logged
//! and swallowed.

pub mod detail;
pub mod recent;
pub mod search;

pub use detail::DetailService;
pub use recent::RecentService;
pub use search::SearchService;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::{self, CacheStore};
use crate::clients::Scraper;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::models::{CatalogEntry, CatalogPage, DetailRecord, EpisodeLinks, RecentEpisode};

/// Cache read degraded to an optional value: absent, expired, backend
/// failure and undecodable payload all come back as `None`.
async fn cache_read<T: DeserializeOwned>(
    enabled: bool,
    store: &dyn CacheStore,
    key: &str,
) -> Option<T> {
    if !enabled {
        return None;
    }
    match cache::get_json(store, key).await {
        Ok(Some(value)) => {
            debug!(key, "Cache hit");
            Some(value)
        }
        Ok(None) => {
            debug!(key, "Cache miss");
            None
        }
        Err(err) => {
            warn!(key, error = %err, "Cache read failed, treating as miss");
            None
        }
    }
}

/// Best-effort write-back. Failures must never fail the caller's request.
async fn cache_write<T: Serialize>(
    enabled: bool,
    store: &dyn CacheStore,
    key: &str,
    value: &T,
    ttl: Duration,
) {
    if !enabled {
        return;
    }
    if let Err(err) = cache::set_json(store, key, value, ttl).await {
        warn!(key, error = %err, "Cache write failed, result served uncached");
    }
}

/// Facade bundling the three query-family services over one shared
/// scraper and cache, wired by the caller's composition root.
pub struct AnimeFlv {
    search: SearchService,
    detail: DetailService,
    recent: RecentService,
}

impl AnimeFlv {
    #[must_use]
    pub fn new(scraper: Arc<dyn Scraper>, store: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self {
            search: SearchService::new(scraper.clone(), store.clone(), config.clone()),
            detail: DetailService::new(scraper.clone(), store.clone(), config.clone()),
            recent: RecentService::new(scraper, store, config),
        }
    }

    pub async fn search(&self, term: &str, page: u32) -> Result<CatalogPage> {
        self.search.search(term, page).await
    }

    pub async fn browse(&self) -> Result<CatalogPage> {
        self.search.browse().await
    }

    pub async fn detail(&self, anime_id: &str) -> Result<DetailRecord> {
        self.detail.detail(anime_id).await
    }

    pub async fn episode_links(&self, anime_id: &str, episode: u32) -> Result<EpisodeLinks> {
        self.detail.links(anime_id, episode).await
    }

    pub async fn recent_catalog(&self) -> Result<Vec<CatalogEntry>> {
        self.recent.recent_catalog().await
    }

    pub async fn recent_episodes(&self) -> Result<Vec<RecentEpisode>> {
        self.recent.recent_episodes().await
    }
}
