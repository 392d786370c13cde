//! Detail-by-id and links-by-id-and-episode query families.

use std::sync::Arc;

use crate::cache::CacheStore;
use crate::clients::Scraper;
use crate::config::CacheConfig;
use crate::error::{Result, ScrapeError};
use crate::models::{DetailRecord, EpisodeLinks};
use crate::scrape::mapper;
use crate::services::{cache_read, cache_write};

fn detail_key(anime_id: &str) -> String {
    format!("anime-info-{anime_id}")
}

fn links_key(anime_id: &str, episode: u32) -> String {
    format!("links-{anime_id}-{episode}")
}

pub struct DetailService {
    scraper: Arc<dyn Scraper>,
    store: Arc<dyn CacheStore>,
    config: CacheConfig,
}

impl DetailService {
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

    /// Fetches the full detail record for one title. The id is normalized
    /// before the cache key is built and before any fetch.
    pub async fn detail(&self, anime_id: &str) -> Result<DetailRecord> {
        if anime_id.trim().is_empty() {
            return Err(ScrapeError::InvalidInput(
                "anime id must not be empty".to_string(),
            ));
        }

        let id = mapper::normalize_id(anime_id);
        let key = detail_key(&id);

        if let Some(cached) =
            cache_read::<DetailRecord>(self.config.enabled, self.store.as_ref(), &key).await
        {
            if !cached.entry.id.is_empty() {
                return Ok(cached);
            }
        }

        let result = self.scraper.detail(&id).await?;
        cache_write(
            self.config.enabled,
            self.store.as_ref(),
            &key,
            &result,
            self.config.detail_ttl(),
        )
        .await;
        Ok(result)
    }

    /// Fetches the playback sources for one episode of a title.
    pub async fn links(&self, anime_id: &str, episode: u32) -> Result<EpisodeLinks> {
        if anime_id.trim().is_empty() {
            return Err(ScrapeError::InvalidInput(
                "anime id must not be empty".to_string(),
            ));
        }

        let id = mapper::normalize_id(anime_id);
        let key = links_key(&id, episode);

        if let Some(cached) =
            cache_read::<EpisodeLinks>(self.config.enabled, self.store.as_ref(), &key).await
        {
            if !cached.anime_id.is_empty() {
                return Ok(cached);
            }
        }

        let result = self.scraper.episode_links(&id, episode).await?;
        cache_write(
            self.config.enabled,
            self.store.as_ref(),
            &key,
            &result,
            self.config.detail_ttl(),
        )
        .await;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_built_from_normalized_inputs() {
        let id = mapper::normalize_id("ONE-PIECE-TV ");
        assert_eq!(detail_key(&id), "anime-info-one-piece-tv");
        assert_eq!(links_key(&id, 1150), "links-one-piece-tv-1150");
    }
}
