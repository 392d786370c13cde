//! The extraction engine: selector-driven HTML parsing, embedded-script
//! JSON recovery and pure normalization into domain records.

pub mod html;
pub mod mapper;
pub mod script;

pub use html::{
    parse_catalog_entries, parse_catalog_page, parse_detail_page, parse_links_page,
    parse_recent_episodes,
};
