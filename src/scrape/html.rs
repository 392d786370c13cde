//! Selector-driven extraction for the four page templates the site serves:
//! search/listing, detail, episode-links and the recent-content home page.
//!
//! Row-level failures (a malformed href, a missing attribute) skip that row
//! only. A page that yields zero rows is reported as [`ScrapeError::NoResults`]
//! so callers can tell "the markup changed or the result set is empty" apart
//! from "HTTP succeeded".

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::error::{Result, ScrapeError};
use crate::models::{CatalogEntry, CatalogPage, DetailRecord, EpisodeLinks, RecentEpisode, RelatedWork};
use crate::scrape::{mapper, script};

/// Consolidates the fixed selector table to avoid per-call parsing.
struct Selectors {
    catalog_item: Selector,
    link: Selector,
    image: Selector,
    item_title: Selector,
    item_kind: Selector,
    item_score: Selector,
    item_synopsis: Selector,
    pagination_item: Selector,
    body: Selector,
    detail_title: Selector,
    detail_kind: Selector,
    detail_synopsis: Selector,
    detail_status: Selector,
    detail_score: Selector,
    detail_image: Selector,
    genres: Selector,
    related_item: Selector,
    script: Selector,
    js_script: Selector,
    recent_item: Selector,
    recent_title: Selector,
    recent_chapter: Selector,
}

impl Selectors {
    fn get() -> Option<&'static Self> {
        static INSTANCE: OnceLock<Option<Selectors>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                Some(Self {
                    catalog_item: Selector::parse("ul.ListAnimes > li > article").ok()?,
                    link: Selector::parse("a").ok()?,
                    image: Selector::parse("img").ok()?,
                    item_title: Selector::parse("h3.Title").ok()?,
                    item_kind: Selector::parse("div.Description span.Type").ok()?,
                    item_score: Selector::parse("span.fa-star").ok()?,
                    item_synopsis: Selector::parse("div.Description p:nth-child(3)").ok()?,
                    pagination_item: Selector::parse("div.NvCnAnm ul.pagination li").ok()?,
                    body: Selector::parse("div.Body").ok()?,
                    detail_title: Selector::parse("h1.Title").ok()?,
                    detail_kind: Selector::parse("div.Container span.Type").ok()?,
                    detail_synopsis: Selector::parse("div.Description p").ok()?,
                    detail_status: Selector::parse("span.fa-tv").ok()?,
                    detail_score: Selector::parse("span.vtprmd").ok()?,
                    detail_image: Selector::parse("div.Image img").ok()?,
                    genres: Selector::parse("nav.Nvgnrs a").ok()?,
                    related_item: Selector::parse("ul.ListAnmRel > li").ok()?,
                    script: Selector::parse("script").ok()?,
                    js_script: Selector::parse(r#"script[type="text/javascript"]"#).ok()?,
                    recent_item: Selector::parse("ul.ListEpisodios > li").ok()?,
                    recent_title: Selector::parse("strong.Title").ok()?,
                    recent_chapter: Selector::parse("span.Capi").ok()?,
                })
            })
            .as_ref()
    }
}

fn relation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\((.*?)\)").expect("Invalid regex pattern defined in code"))
}

/// Text content of the first match under `scope`, trimmed.
fn text_of(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Attribute of the first match under `scope`, or empty.
fn attr_of(scope: ElementRef<'_>, selector: &Selector, name: &str) -> String {
    scope
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(name))
        .unwrap_or_default()
        .to_string()
}

/// Inner HTML of the first match under `scope`, or empty.
fn html_of(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope
        .select(selector)
        .next()
        .map(|el| el.inner_html())
        .unwrap_or_default()
}

fn parse_catalog_item(item: ElementRef<'_>, sel: &Selectors) -> Option<CatalogEntry> {
    let href = item.select(&sel.link).next()?.value().attr("href")?;
    let id = mapper::slug_from_href(href)?;

    let title = text_of(item, &sel.item_title);
    let kind_label = text_of(item, &sel.item_kind);
    let score = mapper::parse_score(&text_of(item, &sel.item_score));
    let cover_url = attr_of(item, &sel.image, "src");
    let synopsis = mapper::clean_fragment(&html_of(item, &sel.item_synopsis));

    Some(mapper::to_catalog_entry(
        id, title, synopsis, &kind_label, score, cover_url,
    ))
}

/// Total page count from the pagination control: the second-to-last item
/// holds the highest page number (the last is the "next" arrow). Absent or
/// unparseable pagination leaves the count at 0 without invalidating
/// already-extracted entries.
fn parse_total_pages(document: &Html, sel: &Selectors) -> u32 {
    let items: Vec<_> = document.select(&sel.pagination_item).collect();
    if items.len() < 2 {
        return 0;
    }
    let text = text_of(items[items.len() - 2], &sel.link);
    text.parse().unwrap_or(0)
}

/// Parses a search or listing page into entries plus the pagination total.
pub fn parse_catalog_page(html: &str) -> Result<CatalogPage> {
    let sel = Selectors::get().ok_or(ScrapeError::NoResults)?;
    let document = Html::parse_document(html);

    let entries: Vec<CatalogEntry> = document
        .select(&sel.catalog_item)
        .filter_map(|item| parse_catalog_item(item, sel))
        .collect();
    let total_pages = parse_total_pages(&document, sel);

    if entries.is_empty() {
        warn!("Catalog page yielded zero entries");
        return Err(ScrapeError::NoResults);
    }

    debug!(count = entries.len(), total_pages, "Parsed catalog page");
    Ok(CatalogPage {
        entries,
        total_pages,
    })
}

/// Parses the catalog rows of a page, discarding pagination. Used for the
/// recent-catalog strip on the home page, which shares the listing markup.
pub fn parse_catalog_entries(html: &str) -> Result<Vec<CatalogEntry>> {
    parse_catalog_page(html).map(|page| page.entries)
}

fn parse_related(item: ElementRef<'_>, sel: &Selectors) -> Option<RelatedWork> {
    let link = item.select(&sel.link).next()?;
    let id = mapper::slug_from_href(link.value().attr("href")?)?;
    let title = link.text().collect::<String>().trim().to_string();

    // The relation kind is a parenthesized label inside the item's text
    // node, e.g. "Boruto (Secuela)".
    let full_text: String = item.text().collect();
    let relation = relation_regex()
        .captures(&full_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    Some(RelatedWork {
        id,
        title,
        relation,
    })
}

/// Parses a detail page: visible markup plus the embedded `var episodes` /
/// `var anime_info` script payloads.
pub fn parse_detail_page(html: &str, anime_id: &str) -> Result<DetailRecord> {
    let sel = Selectors::get().ok_or(ScrapeError::NoResults)?;
    let document = Html::parse_document(html);

    let mut episodes = Vec::new();
    let mut next_episode_date = None;
    for node in document.select(&sel.script) {
        let content: String = node.text().collect();
        if content.contains("var episodes") {
            episodes = script::extract_episode_numbers(&content).unwrap_or_default();
            next_episode_date = script::extract_next_air_date(&content);
        }
    }

    let body = document
        .select(&sel.body)
        .next()
        .ok_or(ScrapeError::NoResults)?;

    let title = text_of(body, &sel.detail_title);
    if title.is_empty() {
        warn!(anime_id, "Detail page yielded no title");
        return Err(ScrapeError::NoResults);
    }

    let kind_label = text_of(body, &sel.detail_kind);
    let synopsis = mapper::clean_fragment(&html_of(body, &sel.detail_synopsis));
    let status_label = text_of(body, &sel.detail_status);
    let score = mapper::parse_score(&text_of(body, &sel.detail_score));
    let cover_url = attr_of(body, &sel.detail_image, "src");
    let genres: Vec<String> = body
        .select(&sel.genres)
        .map(|genre| genre.text().collect::<String>().trim().to_string())
        .collect();
    let related: Vec<RelatedWork> = body
        .select(&sel.related_item)
        .filter_map(|item| parse_related(item, sel))
        .collect();

    let entry = mapper::to_catalog_entry(
        mapper::normalize_id(anime_id),
        title,
        synopsis,
        &kind_label,
        score,
        cover_url,
    );

    debug!(
        anime_id,
        episodes = episodes.len(),
        genres = genres.len(),
        "Parsed detail page"
    );
    Ok(mapper::to_detail_record(
        entry,
        genres,
        &status_label,
        next_episode_date,
        episodes,
        related,
    ))
}

/// Parses an episode playback page into its server sources. The sources
/// live entirely inside a `var videos` script payload; zero recovered
/// sources is an extraction failure.
pub fn parse_links_page(html: &str, anime_id: &str, episode: u32) -> Result<EpisodeLinks> {
    let sel = Selectors::get().ok_or(ScrapeError::NoResults)?;
    let document = Html::parse_document(html);

    let mut sources = Vec::new();
    for node in document.select(&sel.js_script) {
        let content: String = node.text().collect();
        if content.contains("var videos") {
            if let Some(found) = script::extract_video_sources(&content) {
                sources = found;
            }
        }
    }

    let title = document
        .select(&sel.body)
        .next()
        .map(|body| text_of(body, &sel.detail_title))
        .unwrap_or_default();

    if sources.is_empty() {
        warn!(anime_id, episode, "Episode page yielded no video sources");
        return Err(ScrapeError::NoResults);
    }

    debug!(anime_id, episode, sources = sources.len(), "Parsed episode links");
    Ok(mapper::to_episode_links(
        mapper::normalize_id(anime_id),
        title,
        episode,
        sources,
    ))
}

/// Parses the recently-aired strip on the home page.
pub fn parse_recent_episodes(html: &str) -> Result<Vec<RecentEpisode>> {
    let sel = Selectors::get().ok_or(ScrapeError::NoResults)?;
    let document = Html::parse_document(html);

    let mut episodes = Vec::new();
    for item in document.select(&sel.recent_item) {
        let Some(href) = item
            .select(&sel.link)
            .next()
            .and_then(|link| link.value().attr("href"))
        else {
            continue;
        };
        let Some(slug) = mapper::slug_from_href(href) else {
            continue;
        };
        let Some(episode) = mapper::episode_number_from_href(href) else {
            continue;
        };

        let anime_id = mapper::strip_episode_suffix(&slug);
        let title = text_of(item, &sel.recent_title);
        let chapter = text_of(item, &sel.recent_chapter);
        let cover_url = attr_of(item, &sel.image, "src");

        episodes.push(mapper::to_recent_episode(
            anime_id, title, chapter, episode, cover_url,
        ));
    }

    if episodes.is_empty() {
        warn!("Home page yielded zero recent episodes");
        return Err(ScrapeError::NoResults);
    }

    debug!(count = episodes.len(), "Parsed recent episodes");
    Ok(episodes)
}
