//! Cache-aside behavior of the service layer, exercised against a canned
//! scraper double and the in-memory cache backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use aniflv::cache::{CacheStore, MemoryCache};
use aniflv::clients::Scraper;
use aniflv::config::CacheConfig;
use aniflv::models::{
    CatalogEntry, CatalogPage, DetailRecord, EpisodeLinks, Kind, LinkSource, RecentEpisode,
};
use aniflv::services::AnimeFlv;
use aniflv::{Result, ScrapeError};

fn entry(id: &str) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        title: "One Piece".to_string(),
        synopsis: "El Rey de los Piratas.".to_string(),
        kind: Kind::Series,
        score: 4.6,
        cover_url: "https://cdn.example.net/covers/7.jpg".to_string(),
    }
}

/// Canned scraper that counts origin fetches and records requested ids.
#[derive(Default)]
struct FakeScraper {
    fetches: AtomicUsize,
    seen_ids: std::sync::Mutex<Vec<String>>,
}

impl FakeScraper {
    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Scraper for FakeScraper {
    async fn search(&self, query: &str, page: u32) -> Result<CatalogPage> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.seen_ids
            .lock()
            .expect("lock")
            .push(format!("{query}@{page}"));
        Ok(CatalogPage {
            entries: vec![entry("one-piece-tv")],
            total_pages: 26,
        })
    }

    async fn browse(&self) -> Result<CatalogPage> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(CatalogPage {
            entries: vec![entry("one-piece-tv")],
            total_pages: 150,
        })
    }

    async fn detail(&self, anime_id: &str) -> Result<DetailRecord> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.seen_ids.lock().expect("lock").push(anime_id.to_string());
        Ok(DetailRecord {
            entry: entry(anime_id),
            genres: vec!["Acción".to_string()],
            status: aniflv::models::AiringStatus::Airing,
            next_episode_date: Some("2025-09-07".to_string()),
            episodes: vec![1150, 1149],
            related: Vec::new(),
        })
    }

    async fn episode_links(&self, anime_id: &str, episode: u32) -> Result<EpisodeLinks> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(EpisodeLinks {
            anime_id: anime_id.to_string(),
            title: "One Piece".to_string(),
            episode,
            sources: vec![LinkSource {
                server: "sw".to_string(),
                url: Some("https://swiftplayers.com/e/abc".to_string()),
                embed_code: None,
            }],
        })
    }

    async fn recent_catalog(&self) -> Result<Vec<CatalogEntry>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(vec![entry("one-piece-tv")])
    }

    async fn recent_episodes(&self) -> Result<Vec<RecentEpisode>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(vec![RecentEpisode {
            anime_id: "one-piece-tv".to_string(),
            title: "One Piece".to_string(),
            chapter: "Episodio 1150".to_string(),
            episode: 1150,
            cover_url: "/uploads/thumbs/7.jpg".to_string(),
        }])
    }
}

/// Cache backend where every operation fails, to prove cache faults are
/// invisible to callers.
struct BrokenCache;

#[async_trait::async_trait]
impl CacheStore for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(ScrapeError::Cache("backend down".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<()> {
        Err(ScrapeError::Cache("backend down".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Err(ScrapeError::Cache("backend down".to_string()))
    }

    async fn exists(&self, _key: &str) -> Result<bool> {
        Err(ScrapeError::Cache("backend down".to_string()))
    }
}

fn service_with(
    scraper: Arc<FakeScraper>,
    store: Arc<dyn CacheStore>,
) -> AnimeFlv {
    AnimeFlv::new(scraper, store, CacheConfig::default())
}

#[tokio::test]
async fn warm_cache_serves_second_call_without_fetching() {
    let scraper = Arc::new(FakeScraper::default());
    let service = service_with(scraper.clone(), Arc::new(MemoryCache::new()));

    let first = service.search("naruto", 1).await.expect("first call");
    let second = service.search("naruto", 1).await.expect("second call");

    assert_eq!(first, second);
    assert_eq!(scraper.fetch_count(), 1);
}

#[tokio::test]
async fn page_zero_is_normalized_to_page_one() {
    let scraper = Arc::new(FakeScraper::default());
    let store = Arc::new(MemoryCache::new());
    let service = service_with(scraper.clone(), store.clone());

    service.search("naruto", 0).await.expect("search");

    assert!(
        store
            .exists("search-anime-naruto-page-1")
            .await
            .expect("exists")
    );
    assert_eq!(
        scraper.seen_ids.lock().expect("lock").as_slice(),
        ["naruto@1"]
    );
}

#[tokio::test]
async fn search_term_is_slugified_for_key_and_fetch() {
    let scraper = Arc::new(FakeScraper::default());
    let store = Arc::new(MemoryCache::new());
    let service = service_with(scraper.clone(), store.clone());

    service.search("One Piece", 2).await.expect("search");

    assert!(
        store
            .exists("search-anime-one-piece-page-2")
            .await
            .expect("exists")
    );
    assert_eq!(
        scraper.seen_ids.lock().expect("lock").as_slice(),
        ["one-piece@2"]
    );
}

#[tokio::test]
async fn empty_search_term_never_reaches_cache_or_fetcher() {
    let scraper = Arc::new(FakeScraper::default());
    let service = service_with(scraper.clone(), Arc::new(BrokenCache));

    let err = service.search("   ", 1).await.expect_err("must reject");
    assert!(matches!(err, ScrapeError::InvalidInput(_)));
    assert_eq!(scraper.fetch_count(), 0);
}

#[tokio::test]
async fn detail_id_is_normalized_before_fetch_and_key() {
    let scraper = Arc::new(FakeScraper::default());
    let store = Arc::new(MemoryCache::new());
    let service = service_with(scraper.clone(), store.clone());

    service.detail("ONE-PIECE-TV ").await.expect("detail");

    assert_eq!(
        scraper.seen_ids.lock().expect("lock").as_slice(),
        ["one-piece-tv"]
    );
    assert!(
        store
            .exists("anime-info-one-piece-tv")
            .await
            .expect("exists")
    );
}

#[tokio::test]
async fn empty_detail_id_is_rejected_before_io() {
    let scraper = Arc::new(FakeScraper::default());
    let service = service_with(scraper.clone(), Arc::new(MemoryCache::new()));

    let err = service.detail("").await.expect_err("must reject");
    assert!(matches!(err, ScrapeError::InvalidInput(_)));
    let err = service.episode_links(" ", 5).await.expect_err("must reject");
    assert!(matches!(err, ScrapeError::InvalidInput(_)));
    assert_eq!(scraper.fetch_count(), 0);
}

#[tokio::test]
async fn broken_cache_degrades_to_origin_on_every_call() {
    let scraper = Arc::new(FakeScraper::default());
    let service = service_with(scraper.clone(), Arc::new(BrokenCache));

    let first = service.detail("one-piece-tv").await.expect("first call");
    let second = service.detail("one-piece-tv").await.expect("second call");

    assert_eq!(first, second);
    // Read failure is a miss and write failure is swallowed, so both
    // calls hit the origin.
    assert_eq!(scraper.fetch_count(), 2);
}

#[tokio::test]
async fn links_and_recent_families_are_cached_independently() {
    let scraper = Arc::new(FakeScraper::default());
    let store = Arc::new(MemoryCache::new());
    let service = service_with(scraper.clone(), store.clone());

    service.episode_links("one-piece-tv", 1150).await.expect("links");
    service.episode_links("one-piece-tv", 1150).await.expect("links again");
    assert_eq!(scraper.fetch_count(), 1);
    assert!(
        store
            .exists("links-one-piece-tv-1150")
            .await
            .expect("exists")
    );

    service.recent_catalog().await.expect("recent catalog");
    service.recent_episodes().await.expect("recent episodes");
    service.recent_catalog().await.expect("cached catalog");
    service.recent_episodes().await.expect("cached episodes");
    assert_eq!(scraper.fetch_count(), 3);
    assert!(store.exists("recent-anime").await.expect("exists"));
    assert!(store.exists("recent-episode").await.expect("exists"));
}

#[tokio::test]
async fn browse_uses_the_listing_key() {
    let scraper = Arc::new(FakeScraper::default());
    let store = Arc::new(MemoryCache::new());
    let service = service_with(scraper.clone(), store.clone());

    let page = service.browse().await.expect("browse");
    assert_eq!(page.total_pages, 150);
    assert!(store.exists("search-anime-all").await.expect("exists"));

    service.browse().await.expect("cached browse");
    assert_eq!(scraper.fetch_count(), 1);
}

#[tokio::test]
async fn disabled_cache_always_fetches() {
    let scraper = Arc::new(FakeScraper::default());
    let store = Arc::new(MemoryCache::new());
    let config = CacheConfig {
        enabled: false,
        ..CacheConfig::default()
    };
    let service = AnimeFlv::new(scraper.clone(), store.clone(), config);

    service.search("naruto", 1).await.expect("search");
    service.search("naruto", 1).await.expect("search again");

    assert_eq!(scraper.fetch_count(), 2);
    assert!(
        !store
            .exists("search-anime-naruto-page-1")
            .await
            .expect("exists")
    );
}
