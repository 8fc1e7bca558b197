//! Secondary source client for the localized-dub track.
//!
//! The localized track comes from a provider that indexes shows by the
//! external catalog id rather than the primary slug. Two sourcing
//! strategies satisfy the same contract and deployment configuration picks
//! exactly one per [`Resolver`](crate::resolver::Resolver):
//!
//! - [`EmbedProvider`] scrapes the provider's embed page for
//!   `{externalId}/{episode}` with the same harvester the embed extractor
//!   uses (the primary strategy);
//! - [`ApiProvider`] reads the provider's per-show JSON payload.
//!
//! Neither raises past the fetcher boundary: transport failure degrades to
//! an empty list, and a successful fetch that recovers nothing yields one
//! synthetic link to the page itself so callers can still offer an
//! embeddable fallback.

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::config::{LocalizedConfig, LocalizedStrategy};
use crate::extract::{harvest_links, resolve_links};
use crate::net::{HttpClient, json as json_util};
use crate::types::StreamLink;

/// Ordered container-field candidates for the provider's per-episode
/// stream list.
pub const STREAM_CONTAINER_FIELDS: [&str; 3] = ["streams", "links", "sources"];

/// Ordered container-field candidates for the provider's episode array.
pub const EPISODE_CONTAINER_FIELDS: [&str; 3] = ["episodes", "data", "items"];

/// Ordered field-name candidates for an entry's episode number, matched by
/// string equality after coercion.
pub const NUMBER_FIELDS: [&str; 3] = ["episodeNumber", "episode", "number"];

/// Ordered field-name candidates for an entry's id, whose numeric suffix is
/// the last-resort episode number.
pub const ID_FIELDS: [&str; 2] = ["id", "episodeId"];

/// A source of localized-dub stream links.
///
/// Implementations never raise past this boundary; every failure mode is
/// logged and collapsed to an empty list.
#[async_trait]
pub trait LocalizedProvider: Send + Sync {
    /// Short identifier for logs.
    fn id(&self) -> &'static str;

    /// Display name used as the server label in resolved responses.
    fn label(&self) -> String;

    /// Fetches the stream links for one episode of a show.
    async fn streams(&self, external_id: u64, episode: u32) -> Vec<StreamLink>;
}

/// Constructs the provider selected by configuration.
pub fn provider_for(config: &LocalizedConfig) -> Box<dyn LocalizedProvider> {
    match config.strategy {
        LocalizedStrategy::Embed => Box::new(EmbedProvider::new(config)),
        LocalizedStrategy::Api => Box::new(ApiProvider::new(config)),
    }
}

/// Scrape-based provider: harvests the embed page for
/// `{base}/anime/{externalId}/{episode}/{track}`.
pub struct EmbedProvider {
    client: HttpClient,
    base_url: String,
    track: String,
}

impl EmbedProvider {
    pub fn new(config: &LocalizedConfig) -> Self {
        Self {
            client: HttpClient::new("localized")
                .with_timeout(config.timeout())
                .with_header("Accept", "text/html"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            track: config.track.clone(),
        }
    }

    fn page_url(&self, external_id: u64, episode: u32) -> String {
        format!(
            "{}/anime/{}/{}/{}",
            self.base_url,
            external_id,
            episode,
            urlencoding::encode(&self.track)
        )
    }
}

#[async_trait]
impl LocalizedProvider for EmbedProvider {
    fn id(&self) -> &'static str {
        "localized-embed"
    }

    fn label(&self) -> String {
        format!("LOCALIZED-{}", self.track.to_uppercase())
    }

    async fn streams(&self, external_id: u64, episode: u32) -> Vec<StreamLink> {
        let url = self.page_url(external_id, episode);
        match self.client.get_text(&url).await {
            Ok(html) => harvest_links(&html, &url),
            Err(e) => {
                warn!(source = self.id(), url = %url, error = %e, "localized page fetch failed");
                Vec::new()
            }
        }
    }
}

/// API-based provider: reads the per-show JSON payload once and locates the
/// requested episode's stream list in it.
pub struct ApiProvider {
    client: HttpClient,
    base_url: String,
    track: String,
}

impl ApiProvider {
    pub fn new(config: &LocalizedConfig) -> Self {
        Self {
            client: HttpClient::new("localized")
                .with_timeout(config.timeout())
                .with_header("Accept", "application/json"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            track: config.track.clone(),
        }
    }

    fn show_url(&self, external_id: u64) -> String {
        format!("{}/api/anime/{}", self.base_url, external_id)
    }

    fn page_url(&self, external_id: u64, episode: u32) -> String {
        format!(
            "{}/anime/{}/{}/{}",
            self.base_url,
            external_id,
            episode,
            urlencoding::encode(&self.track)
        )
    }
}

#[async_trait]
impl LocalizedProvider for ApiProvider {
    fn id(&self) -> &'static str {
        "localized-api"
    }

    fn label(&self) -> String {
        format!("LOCALIZED-{}", self.track.to_uppercase())
    }

    async fn streams(&self, external_id: u64, episode: u32) -> Vec<StreamLink> {
        let url = self.show_url(external_id);
        let payload: Value = match self.client.get_json(&url).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(source = self.id(), url = %url, error = %e, "localized payload fetch failed");
                return Vec::new();
            }
        };

        let page_url = self.page_url(external_id, episode);
        let links = links_for_episode(&payload, episode, &page_url);
        if links.is_empty() {
            // fetch succeeded; keep an embeddable fallback
            return vec![StreamLink::page(&page_url)];
        }
        links
    }
}

/// Locates the requested episode's entry in a per-show payload and
/// normalizes its stream list.
///
/// Exposed for tests; the payload shape is undocumented upstream, so every
/// field read goes through the ordered candidate lists above.
pub fn links_for_episode(payload: &Value, episode: u32, base_url: &str) -> Vec<StreamLink> {
    let entries = match payload.as_array() {
        Some(entries) => entries.clone(),
        None => json_util::first_array(payload, &EPISODE_CONTAINER_FIELDS),
    };

    let wanted = episode.to_string();
    let Some(entry) = entries
        .iter()
        .find(|entry| episode_key(entry).as_deref() == Some(wanted.as_str()))
    else {
        return Vec::new();
    };

    let candidates = json_util::first_array(entry, &STREAM_CONTAINER_FIELDS)
        .iter()
        .filter_map(link_candidate)
        .collect();

    resolve_links(candidates, base_url)
}

/// An entry's episode number as a coerced string, for equality matching.
///
/// Tries the explicit number fields first, then the numeric suffix of an
/// id-like field (`"...ep=12"` or a trailing `-12`).
pub fn episode_key(entry: &Value) -> Option<String> {
    json_util::first_present(entry, &NUMBER_FIELDS)
        .and_then(|v| json_util::coerce_string(&v))
        .or_else(|| {
            let id = json_util::first_present(entry, &ID_FIELDS)?;
            let id = id.as_str()?;
            let tail = id
                .split_once("ep=")
                .map(|(_, tail)| tail)
                .unwrap_or_else(|| id.rsplit('-').next().unwrap_or(id));
            let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
            (!digits.is_empty()).then_some(digits)
        })
}

/// Normalizes one stream entry into a raw `(url, title)` candidate.
///
/// Entries are raw URL strings, objects carrying a `url` field, or objects
/// where the first absolute-URL string value is taken.
fn link_candidate(entry: &Value) -> Option<(String, Option<String>)> {
    match entry {
        Value::String(url) => Some((url.clone(), None)),
        Value::Object(map) => {
            if let Some(url) = map.get("url").and_then(Value::as_str) {
                let title = json_util::first_present(entry, &["title", "server", "quality"])
                    .and_then(|v| v.as_str().map(str::to_string));
                return Some((url.to_string(), title));
            }
            map.values()
                .filter_map(Value::as_str)
                .find(|s| s.starts_with("http://") || s.starts_with("https://"))
                .map(|url| (url.to_string(), None))
        }
        _ => None,
    }
}
