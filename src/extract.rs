//! Multi-strategy extraction of playable media URLs from embed pages.
//!
//! Embed pages exist only to host a player referencing the actual media, and
//! no two hosts structure them the same way. The harvester applies every
//! strategy in order and accumulates all matches rather than stopping at the
//! first:
//!
//! 1. inline frame sources (primary or lazy-load attribute), tagged `embed`
//! 2. native video element sources, tagged `video`
//! 3. hyperlinks targeting a known media extension or streaming-path marker,
//!    tagged with the link's visible text
//! 4. a regex sweep of inline script bodies for absolute `.m3u8` URLs,
//!    tagged `m3u8`
//!
//! Every recovered URL is resolved absolute against the page's base URL and
//! de-duplicated (first occurrence wins). A page that yields nothing still
//! produces one fallback entry pointing at the page itself, so a caller
//! always has something embeddable when the fetch succeeded.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

use crate::config::PrimaryConfig;
use crate::error::Result;
use crate::net::HttpClient;
use crate::types::{ServerRef, StreamLink};

/// Media file extensions recognized in anchor targets.
pub const MEDIA_EXTENSIONS: [&str; 5] = ["m3u8", "mp4", "mkv", "m3u", "mpd"];

/// Path markers identifying a streaming link regardless of extension.
pub const STREAM_MARKERS: [&str; 2] = ["/stream/", "drive.google.com"];

static MEDIA_HREF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\.({})(\?|$)", MEDIA_EXTENSIONS.join("|"))).unwrap()
});

static M3U8_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^'"\s]+\.m3u8[^'"\s]*"#).unwrap());

/// Resolves raw `(url, title)` candidates against a base URL and
/// de-duplicates them by absolute URL.
///
/// The first occurrence of each absolute URL wins, keeping its first-seen
/// tag. Candidates that resolve to nothing parseable are dropped.
pub fn resolve_links(candidates: Vec<(String, Option<String>)>, base_url: &str) -> Vec<StreamLink> {
    let base = Url::parse(base_url).ok();
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for (raw, title) in candidates {
        let absolute = match Url::parse(&raw) {
            Ok(url) => url.to_string(),
            Err(_) => match base.as_ref().and_then(|b| b.join(&raw).ok()) {
                Some(url) => url.to_string(),
                None => continue,
            },
        };
        if seen.insert(absolute.clone()) {
            links.push(StreamLink::new(absolute, title));
        }
    }

    links
}

/// Harvests stream link candidates from an embed page body.
///
/// Applies all four strategies, resolves every match absolute against
/// `page_url`, de-duplicates, and falls back to the page URL itself when
/// nothing was recovered.
///
/// # Examples
///
/// ```rust
/// use nagare::extract::harvest_links;
///
/// let links = harvest_links("<html><body>nothing here</body></html>",
///     "https://embed.example/anime/21/5/hindi");
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].url, "https://embed.example/anime/21/5/hindi");
/// ```
pub fn harvest_links(html: &str, page_url: &str) -> Vec<StreamLink> {
    let document = Html::parse_document(html);
    let mut candidates: Vec<(String, Option<String>)> = Vec::new();

    // 1) iframes, src or lazy-load attribute
    if let Ok(sel) = Selector::parse("iframe") {
        for el in document.select(&sel) {
            let src = el
                .value()
                .attr("src")
                .or_else(|| el.value().attr("data-src"));
            if let Some(src) = src {
                candidates.push((src.to_string(), Some("embed".to_string())));
            }
        }
    }

    // 2) video > source
    if let Ok(sel) = Selector::parse("video source") {
        for el in document.select(&sel) {
            if let Some(src) = el.value().attr("src") {
                candidates.push((src.to_string(), Some("video".to_string())));
            }
        }
    }

    // 3) anchors targeting media files or known stream paths
    if let Ok(sel) = Selector::parse("a[href]") {
        for el in document.select(&sel) {
            let Some(href) = el.value().attr("href") else {
                continue;
            };
            let is_media = MEDIA_HREF_RE.is_match(href)
                || STREAM_MARKERS.iter().any(|marker| href.contains(marker));
            if is_media {
                let text = el.text().collect::<String>().trim().to_string();
                let title = if text.is_empty() {
                    "link".to_string()
                } else {
                    text
                };
                candidates.push((href.to_string(), Some(title)));
            }
        }
    }

    // 4) m3u8 sweep over inline script bodies
    if let Ok(sel) = Selector::parse("script") {
        let scripts = document
            .select(&sel)
            .map(|s| s.text().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        for m in M3U8_RE.find_iter(&scripts) {
            candidates.push((m.as_str().to_string(), Some("m3u8".to_string())));
        }
    }

    let links = resolve_links(candidates, page_url);
    if links.is_empty() {
        return vec![StreamLink::page(page_url)];
    }
    links
}

/// Fetches a listed server's embed page and harvests its stream links.
pub struct EmbedExtractor {
    client: HttpClient,
    base_url: String,
}

impl EmbedExtractor {
    pub fn new(config: &PrimaryConfig) -> Self {
        Self {
            client: HttpClient::new("embed")
                .with_timeout(config.timeout())
                .with_header("Accept", "text/html"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reconstructs the canonical embed page location for a listed server.
    pub fn embed_url(&self, server: &ServerRef, episode: u32) -> String {
        format!(
            "{}/embed/{}/{}?ep={}",
            self.base_url,
            server.track,
            urlencoding::encode(&server.name.to_lowercase()),
            episode
        )
    }

    /// Fetches the embed page for a server and harvests stream links.
    ///
    /// # Errors
    ///
    /// [`Error::ExtractionFailed`](crate::Error::ExtractionFailed) when the
    /// page fetch itself fails; an empty harvest degrades to the page-URL
    /// fallback instead.
    pub async fn extract(&self, server: &ServerRef, episode: u32) -> Result<Vec<StreamLink>> {
        let url = self.embed_url(server, episode);
        let html = self.client.get_text(&url).await.map_err(|e| {
            crate::Error::extraction(format!("embed page fetch failed for {}: {}", server.name, e))
        })?;
        Ok(harvest_links(&html, &url))
    }
}
