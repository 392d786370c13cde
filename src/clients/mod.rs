//! Outbound collaborators: the origin-site scraper client, the shared rate
//! limiter, and the video-URL resolver contract.

pub mod animeflv;
pub mod rate_limit;
pub mod resolver;

pub use animeflv::AnimeFlvClient;
pub use rate_limit::TokenBucket;
pub use resolver::VideoUrlResolver;

use crate::error::Result;
use crate::models::{CatalogEntry, CatalogPage, DetailRecord, EpisodeLinks, RecentEpisode};

/// Capability interface over the origin site. One implementation exists
/// today ([`AnimeFlvClient`]); the service layer depends only on this
/// trait, so a second origin or a canned test double slots in without
/// touching cache-aside logic.
#[async_trait::async_trait]
pub trait Scraper: Send + Sync {
    /// Searches the catalog by (already normalized) term with paging.
    async fn search(&self, query: &str, page: u32) -> Result<CatalogPage>;

    /// Fetches the unfiltered catalog listing.
    async fn browse(&self) -> Result<CatalogPage>;

    /// Fetches the full detail record for one title.
    async fn detail(&self, anime_id: &str) -> Result<DetailRecord>;

    /// Fetches the playback sources for one episode of a title.
    async fn episode_links(&self, anime_id: &str, episode: u32) -> Result<EpisodeLinks>;

    /// Fetches the recently-added titles from the home page.
    async fn recent_catalog(&self) -> Result<Vec<CatalogEntry>>;

    /// Fetches the recently-aired episodes from the home page.
    async fn recent_episodes(&self) -> Result<Vec<RecentEpisode>>;
}
