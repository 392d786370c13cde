pub mod anime;
pub mod episode;

pub use anime::{AiringStatus, CatalogEntry, CatalogPage, DetailRecord, Kind, RelatedWork};
pub use episode::{EpisodeLinks, LinkSource, RecentEpisode};
