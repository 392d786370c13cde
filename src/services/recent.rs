//! Recent-catalog and recent-episodes query families: parameterless
//! queries against the home page.

use std::sync::Arc;

use crate::cache::CacheStore;
use crate::clients::Scraper;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::models::{CatalogEntry, RecentEpisode};
use crate::services::{cache_read, cache_write};

const RECENT_CATALOG_KEY: &str = "recent-anime";
const RECENT_EPISODES_KEY: &str = "recent-episode";

pub struct RecentService {
    scraper: Arc<dyn Scraper>,
    store: Arc<dyn CacheStore>,
    config: CacheConfig,
}

impl RecentService {
    #[must_use]
    pub const fn new(
        scraper: Arc<dyn Scraper>,
        store: Arc<dyn CacheStore>,
        config: CacheConfig,
    ) -> Self {
        Self {
            scraper,
            store,
            config,
        }
    }

    /// Recently-added titles from the home page.
    pub async fn recent_catalog(&self) -> Result<Vec<CatalogEntry>> {
        if let Some(cached) =
            cache_read::<Vec<CatalogEntry>>(self.config.enabled, self.store.as_ref(), RECENT_CATALOG_KEY)
                .await
        {
            if !cached.is_empty() {
                return Ok(cached);
            }
        }

        let result = self.scraper.recent_catalog().await?;
        cache_write(
            self.config.enabled,
            self.store.as_ref(),
            RECENT_CATALOG_KEY,
            &result,
            self.config.recent_ttl(),
        )
        .await;
        Ok(result)
    }

    /// Recently-aired episodes from the home page.
    pub async fn recent_episodes(&self) -> Result<Vec<RecentEpisode>> {
        if let Some(cached) =
            cache_read::<Vec<RecentEpisode>>(self.config.enabled, self.store.as_ref(), RECENT_EPISODES_KEY)
                .await
        {
            if !cached.is_empty() {
                return Ok(cached);
            }
        }

        let result = self.scraper.recent_episodes().await?;
        cache_write(
            self.config.enabled,
            self.store.as_ref(),
            RECENT_EPISODES_KEY,
            &result,
            self.config.recent_ttl(),
        )
        .await;
        Ok(result)
    }
}
