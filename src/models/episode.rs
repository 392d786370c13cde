use serde::{Deserialize, Serialize};

/// One playable server entry for an episode, flattened from the site's
/// embedded video table. Fields the public contract does not cover
/// (ads, mobile flags, display titles) are dropped at extraction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSource {
    pub server: String,
    /// Embed page URL, when the server publishes one.
    pub url: Option<String>,
    /// Embed code or per-server video identifier, when present.
    pub embed_code: Option<String>,
}

/// All playback sources for a single episode of a title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeLinks {
    pub anime_id: String,
    pub title: String,
    pub episode: u32,
    pub sources: Vec<LinkSource>,
}

/// Summary row from the recently-aired strip on the home page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEpisode {
    pub anime_id: String,
    pub title: String,
    /// Chapter designation as displayed, e.g. "Episodio 1050".
    pub chapter: String,
    pub episode: i32,
    pub cover_url: String,
}
