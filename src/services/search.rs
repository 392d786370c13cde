//! Search-by-term and unfiltered-listing query families.

use std::sync::Arc;

use crate::cache::CacheStore;
use crate::clients::Scraper;
use crate::config::CacheConfig;
use crate::error::{Result, ScrapeError};
use crate::models::CatalogPage;
use crate::services::{cache_read, cache_write};

/// Lowercases a search term and replaces spaces with hyphens, matching
/// the site's slug convention.
fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase().replace(' ', "-")
}

fn search_key(term: &str, page: u32) -> String {
    format!("search-anime-{term}-page-{page}")
}

const LISTING_KEY: &str = "search-anime-all";

pub struct SearchService {
    scraper: Arc<dyn Scraper>,
    store: Arc<dyn CacheStore>,
    config: CacheConfig,
}

impl SearchService {
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

    /// Searches the catalog by free-text term with paging. Page `0` is
    /// treated as page `1`.
    pub async fn search(&self, term: &str, page: u32) -> Result<CatalogPage> {
        if term.trim().is_empty() {
            return Err(ScrapeError::InvalidInput(
                "search term must not be empty".to_string(),
            ));
        }

        let term = normalize_term(term);
        let page = page.max(1);
        let key = search_key(&term, page);

        if let Some(cached) =
            cache_read::<CatalogPage>(self.config.enabled, self.store.as_ref(), &key).await
        {
            // A cached page with zero entries is re-fetched rather than
            // trusted: an empty success is indistinguishable from a stale
            // placeholder here.
            if !cached.entries.is_empty() {
                return Ok(cached);
            }
        }

        let result = self.scraper.search(&term, page).await?;
        cache_write(
            self.config.enabled,
            self.store.as_ref(),
            &key,
            &result,
            self.config.search_ttl(),
        )
        .await;
        Ok(result)
    }

    /// Fetches the unfiltered catalog listing.
    pub async fn browse(&self) -> Result<CatalogPage> {
        if let Some(cached) =
            cache_read::<CatalogPage>(self.config.enabled, self.store.as_ref(), LISTING_KEY).await
        {
            if !cached.entries.is_empty() {
                return Ok(cached);
            }
        }

        let result = self.scraper.browse().await?;
        cache_write(
            self.config.enabled,
            self.store.as_ref(),
            LISTING_KEY,
            &result,
            self.config.search_ttl(),
        )
        .await;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_is_lowercased_and_hyphenated() {
        assert_eq!(normalize_term("One Piece"), "one-piece");
        assert_eq!(normalize_term(" NARUTO "), "naruto");
    }

    #[test]
    fn key_includes_family_term_and_page() {
        assert_eq!(
            search_key(&normalize_term("naruto"), 1),
            "search-anime-naruto-page-1"
        );
        assert_eq!(
            search_key(&normalize_term("one piece"), 3),
            "search-anime-one-piece-page-3"
        );
    }
}
