use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,

    pub fetch: FetchConfig,

    pub cache: CacheConfig,
}

/// URL templates for the single origin site. Only the base varies in
/// practice (the site rotates `www3`/`m` hosts); the paths are fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub browse_path: String,
    pub anime_path: String,
    pub episode_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www3.animeflv.net".to_string(),
            browse_path: "/browse".to_string(),
            anime_path: "/anime".to_string(),
            episode_path: "/ver".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Overall per-request timeout in seconds.
    pub timeout_seconds: u64,

    /// Sustained request rate against the origin, in requests per second.
    pub rate_per_second: f64,

    /// Token-bucket burst allowance.
    pub burst: u32,

    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            rate_per_second: 3.0,
            burst: 5,
            user_agent: "aniflv/0.1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,

    /// TTL for per-page search and listing results. Short: listings churn.
    pub search_ttl_seconds: u64,

    /// TTL for detail records. Longer: detail pages are mostly static.
    pub detail_ttl_seconds: u64,

    /// TTL for the recent-content strips on the home page.
    pub recent_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            search_ttl_seconds: 15 * 60,
            detail_ttl_seconds: 60 * 60,
            recent_ttl_seconds: 5 * 60,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn search_ttl(&self) -> Duration {
        Duration::from_secs(self.search_ttl_seconds)
    }

    #[must_use]
    pub const fn detail_ttl(&self) -> Duration {
        Duration::from_secs(self.detail_ttl_seconds)
    }

    #[must_use]
    pub const fn recent_ttl(&self) -> Duration {
        Duration::from_secs(self.recent_ttl_seconds)
    }
}

impl Config {
    /// Loads configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "No config file found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Rejects values the fetcher and cache layers cannot operate with.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.site.base_url.starts_with("http"),
            "site.base_url must be an http(s) URL, got '{}'",
            self.site.base_url
        );
        anyhow::ensure!(
            self.fetch.rate_per_second > 0.0,
            "fetch.rate_per_second must be positive"
        );
        anyhow::ensure!(self.fetch.burst > 0, "fetch.burst must be at least 1");
        anyhow::ensure!(
            self.fetch.timeout_seconds > 0,
            "fetch.timeout_seconds must be positive"
        );
        if self.cache.enabled {
            anyhow::ensure!(
                self.cache.search_ttl_seconds > 0
                    && self.cache.detail_ttl_seconds > 0
                    && self.cache.recent_ttl_seconds > 0,
                "every cache TTL must be a positive duration"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        Config::default().validate().expect("defaults must be valid");
    }

    #[test]
    fn zero_ttl_is_rejected_while_cache_enabled() {
        let mut config = Config::default();
        config.cache.detail_ttl_seconds = 0;
        assert!(config.validate().is_err());

        config.cache.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_rate_is_rejected() {
        let mut config = Config::default();
        config.fetch.rate_per_second = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_merges_partial_file_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            "[fetch]\nrate_per_second = 1.5\n\n[cache]\nsearch_ttl_seconds = 60"
        )
        .expect("write config");

        let config = Config::load(file.path()).expect("load config");
        assert!((config.fetch.rate_per_second - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.cache.search_ttl_seconds, 60);
        // Untouched sections keep their defaults.
        assert_eq!(config.fetch.timeout_seconds, 30);
        assert_eq!(config.site.browse_path, "/browse");
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/aniflv.toml").expect("defaults");
        assert_eq!(config.fetch.burst, 5);
    }
}
