use serde::{Deserialize, Serialize};

/// Content category as advertised on listing rows and detail pages.
///
/// Labels outside the known set map to `Unknown` instead of failing the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Kind {
    Series,
    Ova,
    Movie,
    Special,
    #[default]
    Unknown,
}

impl Kind {
    /// Maps the site's free-text type label to the closed enumeration.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "anime" => Self::Series,
            "ova" => Self::Ova,
            "película" | "pelicula" => Self::Movie,
            "especial" => Self::Special,
            _ => Self::Unknown,
        }
    }
}

/// Airing state shown on detail pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AiringStatus {
    Airing,
    Finished,
    #[default]
    Unknown,
}

impl AiringStatus {
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "en emision" | "en emisión" => Self::Airing,
            "finalizado" => Self::Finished,
            _ => Self::Unknown,
        }
    }
}

/// One catalog row: the basic identity of a title as it appears on
/// listing and search pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Slug derived from the canonical `/anime/{id}` path segment.
    /// Always non-empty and lowercase.
    pub id: String,
    pub title: String,
    pub synopsis: String,
    pub kind: Kind,
    /// Star rating in `[0, 10]`; `0.0` when the row carried no parseable score.
    pub score: f64,
    pub cover_url: String,
}

/// A page of catalog entries plus the pagination total, when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CatalogPage {
    pub entries: Vec<CatalogEntry>,
    /// Read from the pagination control; `0` when the page is unpaginated.
    pub total_pages: u32,
}

/// A related title (sequel, prequel, spin-off) linked from a detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedWork {
    pub id: String,
    pub title: String,
    /// Parenthesized relation label, e.g. "Secuela". Empty when absent.
    pub relation: String,
}

/// Full detail-page record: the catalog entry plus everything only the
/// detail page knows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub genres: Vec<String>,
    pub status: AiringStatus,
    /// Next-air-date string as the site declares it, when airing.
    pub next_episode_date: Option<String>,
    /// Episode numbers in source order. The site does not guarantee the
    /// order is sorted; consumers must not assume it.
    pub episodes: Vec<i32>,
    pub related: Vec<RelatedWork>,
}
