//! Pure normalization from extracted primitives to typed domain records.
//!
//! Nothing in here performs I/O; every function takes the same strings and
//! numbers the HTML/script extractors produce and can be unit-tested with
//! literal tuples.

use crate::models::{
    AiringStatus, CatalogEntry, DetailRecord, EpisodeLinks, Kind, LinkSource, RecentEpisode,
    RelatedWork,
};

/// Canonical id form: trimmed and lowercased.
#[must_use]
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Extracts the slug from an `/{kind}/{id}` href, e.g.
/// `/anime/one-piece-tv` -> `one-piece-tv`. A href without a third path
/// segment is malformed and yields `None` (the caller skips that row).
#[must_use]
pub fn slug_from_href(href: &str) -> Option<String> {
    let slug = href.split('/').nth(2)?;
    if slug.is_empty() {
        return None;
    }
    Some(normalize_id(slug))
}

/// Extracts the trailing episode number from an episode href, e.g.
/// `/ver/one-piece-tv-1150` -> `1150`.
#[must_use]
pub fn episode_number_from_href(href: &str) -> Option<i32> {
    let (_, tail) = href.rsplit_once('-')?;
    tail.parse().ok()
}

/// Drops a trailing `-<number>` suffix, normalizing an episode slug back
/// to its anime id: `one-piece-tv-1150` -> `one-piece-tv`.
#[must_use]
pub fn strip_episode_suffix(id: &str) -> String {
    match id.rsplit_once('-') {
        Some((head, tail)) if tail.parse::<u32>().is_ok() => head.to_string(),
        _ => id.to_string(),
    }
}

/// Parses a star-rating fragment. An unparseable or missing score is `0.0`
/// for that row rather than a fatal error; valid scores are clamped to the
/// site's 0-10 scale.
#[must_use]
pub fn parse_score(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .map_or(0.0, |score| score.clamp(0.0, 10.0))
}

/// HTML-unescapes a text fragment and trims surrounding whitespace.
#[must_use]
pub fn clean_fragment(fragment: &str) -> String {
    html_escape::decode_html_entities(fragment).trim().to_string()
}

#[must_use]
pub fn to_catalog_entry(
    id: String,
    title: String,
    synopsis: String,
    kind_label: &str,
    score: f64,
    cover_url: String,
) -> CatalogEntry {
    CatalogEntry {
        id,
        title,
        synopsis,
        kind: Kind::from_label(kind_label),
        score,
        cover_url,
    }
}

#[must_use]
pub fn to_detail_record(
    entry: CatalogEntry,
    genres: Vec<String>,
    status_label: &str,
    next_episode_date: Option<String>,
    episodes: Vec<i32>,
    related: Vec<RelatedWork>,
) -> DetailRecord {
    DetailRecord {
        entry,
        genres,
        status: AiringStatus::from_label(status_label),
        next_episode_date,
        episodes,
        related,
    }
}

#[must_use]
pub fn to_episode_links(
    anime_id: String,
    title: String,
    episode: u32,
    sources: Vec<LinkSource>,
) -> EpisodeLinks {
    EpisodeLinks {
        anime_id,
        title,
        episode,
        sources,
    }
}

#[must_use]
pub fn to_recent_episode(
    anime_id: String,
    title: String,
    chapter: String,
    episode: i32,
    cover_url: String,
) -> RecentEpisode {
    RecentEpisode {
        anime_id,
        title,
        chapter,
        episode,
        cover_url,
    }
}
