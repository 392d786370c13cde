//! HTTP client for the origin site.
//!
//! Every request funnels through one rate-limited `fetch`: wait for a
//! token, GET with the client-wide timeout, reject non-2xx before any
//! parsing. Page bodies are handed to the extraction engine untouched.

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::clients::{Scraper, rate_limit::TokenBucket};
use crate::config::{Config, FetchConfig, SiteConfig};
use crate::error::{Result, ScrapeError};
use crate::models::{CatalogEntry, CatalogPage, DetailRecord, EpisodeLinks, RecentEpisode};
use crate::scrape;

pub struct AnimeFlvClient {
    http: Client,
    limiter: TokenBucket,
    site: SiteConfig,
}

impl AnimeFlvClient {
    /// Builds a client with its own connection pool.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = build_http_client(&config.fetch)?;
        Ok(Self::with_shared_client(http, config))
    }

    /// Builds a client around an already-constructed `reqwest::Client`,
    /// allowing connection reuse across collaborators.
    #[must_use]
    pub fn with_shared_client(http: Client, config: &Config) -> Self {
        Self {
            http,
            limiter: TokenBucket::new(config.fetch.rate_per_second, config.fetch.burst),
            site: config.site.clone(),
        }
    }

    fn browse_url(&self, query: Option<&str>, page: Option<u32>) -> Result<Url> {
        let mut url = self.join(&self.site.browse_path)?;
        if query.is_some() || page.is_some() {
            let mut pairs = url.query_pairs_mut();
            if let Some(query) = query {
                pairs.append_pair("q", query);
            }
            if let Some(page) = page {
                pairs.append_pair("page", &page.to_string());
            }
        }
        Ok(url)
    }

    fn detail_url(&self, anime_id: &str) -> Result<Url> {
        self.join(&format!("{}/{anime_id}", self.site.anime_path))
    }

    fn episode_url(&self, anime_id: &str, episode: u32) -> Result<Url> {
        self.join(&format!("{}/{anime_id}-{episode}", self.site.episode_path))
    }

    fn join(&self, path: &str) -> Result<Url> {
        let raw = format!("{}{path}", self.site.base_url);
        Url::parse(&raw).map_err(|err| ScrapeError::InvalidInput(format!("bad URL '{raw}': {err}")))
    }

    /// Rate-limited GET returning the response body. A non-2xx status is
    /// terminal for the call; no partial body is parsed.
    async fn fetch(&self, url: Url) -> Result<String> {
        self.limiter.acquire().await;

        debug!(url = %url, "Fetching page");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl Scraper for AnimeFlvClient {
    async fn search(&self, query: &str, page: u32) -> Result<CatalogPage> {
        let url = self.browse_url(Some(query), Some(page))?;
        let body = self.fetch(url).await?;
        scrape::parse_catalog_page(&body)
    }

    async fn browse(&self) -> Result<CatalogPage> {
        let url = self.browse_url(None, None)?;
        let body = self.fetch(url).await?;
        scrape::parse_catalog_page(&body)
    }

    async fn detail(&self, anime_id: &str) -> Result<DetailRecord> {
        let url = self.detail_url(anime_id)?;
        let body = self.fetch(url).await?;
        scrape::parse_detail_page(&body, anime_id)
    }

    async fn episode_links(&self, anime_id: &str, episode: u32) -> Result<EpisodeLinks> {
        let url = self.episode_url(anime_id, episode)?;
        let body = self.fetch(url).await?;
        scrape::parse_links_page(&body, anime_id, episode)
    }

    async fn recent_catalog(&self) -> Result<Vec<CatalogEntry>> {
        let url = self.join("/")?;
        let body = self.fetch(url).await?;
        scrape::parse_catalog_entries(&body)
    }

    async fn recent_episodes(&self) -> Result<Vec<RecentEpisode>> {
        let url = self.join("/")?;
        let body = self.fetch(url).await?;
        scrape::parse_recent_episodes(&body)
    }
}

/// Shared HTTP client with the defaults every collaborator uses: overall
/// request timeout, project user-agent, pooled connections.
pub fn build_http_client(fetch: &FetchConfig) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(std::time::Duration::from_secs(fetch.timeout_seconds))
        .user_agent(fetch.user_agent.clone())
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))
}
