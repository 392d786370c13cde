//! Recovery of JSON literals embedded in inline `<script>` bodies.
//!
//! The site declares three JavaScript variables carrying structured data:
//! `var episodes` (array of `[episodeNumber, id]` pairs), `var anime_info`
//! (metadata array whose fourth element is the next air date) and
//! `var videos` (server table keyed by subtitle track). Each target is
//! matched independently and decoded with `serde_json`; a failure in one
//! never aborts the others; it degrades to `None` with a logged warning.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::warn;

use crate::models::LinkSource;

fn episodes_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"var episodes = (\[\[.*?\]\]);").expect("Invalid regex pattern defined in code")
    })
}

fn anime_info_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"var anime_info = (\[.*?\]);").expect("Invalid regex pattern defined in code")
    })
}

fn videos_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"var videos = (\{.*?\});").expect("Invalid regex pattern defined in code")
    })
}

/// Server entry inside the `var videos` table. Only the fields the public
/// contract keeps are deserialized; `title`, `ads` and `allow_mobile` are
/// dropped here.
#[derive(Debug, Deserialize)]
struct VideoServer {
    server: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// The video table keyed by track. Only the subtitled track is consumed.
#[derive(Debug, Deserialize)]
struct VideoTable {
    #[serde(rename = "SUB", default)]
    sub: Vec<VideoServer>,
}

/// Decodes `var episodes = [[...]];`, keeping each inner array's first
/// element (the episode number) in source order. `None` when the script
/// contains no such declaration or the literal fails to decode.
#[must_use]
pub fn extract_episode_numbers(script: &str) -> Option<Vec<i32>> {
    let literal = episodes_regex().captures(script)?.get(1)?.as_str();
    match serde_json::from_str::<Vec<Vec<i32>>>(literal) {
        Ok(pairs) => Some(
            pairs
                .iter()
                .filter_map(|pair| pair.first().copied())
                .collect(),
        ),
        Err(err) => {
            warn!(error = %err, "Failed to decode embedded episode list");
            None
        }
    }
}

/// Decodes `var anime_info = [...];` and returns the fourth element, the
/// next-air-date string, when present.
#[must_use]
pub fn extract_next_air_date(script: &str) -> Option<String> {
    let literal = anime_info_regex().captures(script)?.get(1)?.as_str();
    match serde_json::from_str::<Vec<serde_json::Value>>(literal) {
        Ok(info) => info
            .get(3)
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string),
        Err(err) => {
            warn!(error = %err, "Failed to decode embedded anime_info metadata");
            None
        }
    }
}

/// Decodes `var videos = {...};` and flattens the `SUB` track into
/// [`LinkSource`] values, preserving server order.
#[must_use]
pub fn extract_video_sources(script: &str) -> Option<Vec<LinkSource>> {
    let literal = videos_regex().captures(script)?.get(1)?.as_str();
    match serde_json::from_str::<VideoTable>(literal) {
        Ok(table) => Some(
            table
                .sub
                .into_iter()
                .map(|entry| LinkSource {
                    server: entry.server,
                    url: entry.url,
                    embed_code: entry.code,
                })
                .collect(),
        ),
        Err(err) => {
            warn!(error = %err, "Failed to decode embedded video table");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_SCRIPT: &str = r#"
        var anime_info = ["3428","One Piece","one-piece-tv","2025-09-07"];
        var episodes = [[1150,64301],[1149,64203],[1148,64105]];
        $(document).ready(function(){});
    "#;

    const VIDEOS_SCRIPT: &str = r#"
        var videos = {"SUB": [{"server":"sw","title":"SW","ads":0,"url":"https://swiftplayers.com/e/abc","allow_mobile":true},{"server":"yu","title":"YourUpload","ads":1,"code":"https://www.yourupload.com/embed/xyz","allow_mobile":false}]};
    "#;

    #[test]
    fn episode_list_keeps_first_elements_in_source_order() {
        let episodes = extract_episode_numbers(DETAIL_SCRIPT).expect("episodes present");
        assert_eq!(episodes, vec![1150, 1149, 1148]);
    }

    #[test]
    fn episode_list_length_matches_inner_array_count() {
        let script = "var episodes = [[5,50],[3,30],[9,90],[1,10]];";
        let episodes = extract_episode_numbers(script).expect("episodes present");
        assert_eq!(episodes.len(), 4);
    }

    #[test]
    fn next_air_date_is_fourth_element() {
        assert_eq!(
            extract_next_air_date(DETAIL_SCRIPT).as_deref(),
            Some("2025-09-07")
        );
    }

    #[test]
    fn short_anime_info_has_no_air_date() {
        let script = r#"var anime_info = ["3428","One Piece","one-piece-tv"];"#;
        assert_eq!(extract_next_air_date(script), None);
    }

    #[test]
    fn video_table_flattens_sub_track_only() {
        let sources = extract_video_sources(VIDEOS_SCRIPT).expect("videos present");
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].server, "sw");
        assert_eq!(sources[0].url.as_deref(), Some("https://swiftplayers.com/e/abc"));
        assert_eq!(sources[0].embed_code, None);
        assert_eq!(sources[1].server, "yu");
        assert_eq!(
            sources[1].embed_code.as_deref(),
            Some("https://www.yourupload.com/embed/xyz")
        );
    }

    #[test]
    fn missing_declarations_yield_none_not_errors() {
        let script = "console.log('nothing to see here');";
        assert_eq!(extract_episode_numbers(script), None);
        assert_eq!(extract_next_air_date(script), None);
        assert!(extract_video_sources(script).is_none());
    }

    #[test]
    fn one_broken_literal_does_not_poison_the_others() {
        let script = r#"
            var episodes = [[not json]];
            var anime_info = ["1","One Piece","one-piece-tv","2025-09-07"];
        "#;
        assert_eq!(extract_episode_numbers(script), None);
        assert_eq!(
            extract_next_air_date(script).as_deref(),
            Some("2025-09-07")
        );
    }
}
