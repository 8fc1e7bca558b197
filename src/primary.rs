//! Primary source client: episode listings and per-episode server listings.
//!
//! The primary site exposes its listings through informal ajax endpoints
//! (versioned by the `v2` path segment) that answer either with an HTML
//! fragment wrapped in JSON or with an already-structured payload. Both
//! shapes are normalized to the crate's types here, so call sites never
//! branch on the response shape.

use scraper::Selector;
use serde_json::Value;

use crate::config::PrimaryConfig;
use crate::error::{Error, Result};
use crate::net::{HttpClient, html, json as json_util};
use crate::types::{Episode, ServerListing, ServerRef, Track};

/// Ordered field-name candidates for upstream episode records.
///
/// The primary source names the same field differently across response
/// shapes; each record is tried against these lists in order and the first
/// present candidate wins. This is the single place that policy lives.
pub const EPISODE_NUMBER_FIELDS: [&str; 3] = ["episodeNumber", "episode", "number"];
pub const EPISODE_ID_FIELDS: [&str; 2] = ["id", "episodeId"];
pub const EPISODE_TITLE_FIELDS: [&str; 2] = ["title", "name"];
pub const EPISODE_FILLER_FIELDS: [&str; 2] = ["isFiller", "filler"];
pub const SUB_SERVER_FIELDS: [&str; 4] = ["subStreams", "sources.sub", "streams.sub", "sub"];
pub const DUB_SERVER_FIELDS: [&str; 4] = ["dubStreams", "sources.dub", "streams.dub", "dub"];

/// Client for the primary site's listing endpoints.
pub struct PrimaryClient {
    client: HttpClient,
    base_url: String,
}

impl PrimaryClient {
    pub fn new(config: &PrimaryConfig) -> Self {
        let client = HttpClient::new("primary")
            .with_timeout(config.timeout())
            .with_header(
                "Accept",
                "text/html,application/json;q=0.9,*/*;q=0.8",
            )
            .with_header("X-Requested-With", "XMLHttpRequest");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Canonical watch-page URL for a show, used as the Referer on listing
    /// requests.
    pub fn watch_url(&self, slug: &str) -> String {
        format!("{}/watch/{}", self.base_url, slug)
    }

    /// The numeric listing id embedded at the tail of a slug.
    fn listing_id(slug: &str) -> Result<&str> {
        slug.rsplit('-')
            .next()
            .filter(|tail| !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()))
            .ok_or_else(|| {
                Error::invalid_input_example("Make sure the id is correct", "one-piece-100")
            })
    }

    /// Fetches and normalizes the episode listing for a show.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidInput`] - slug carries no trailing numeric id
    /// * [`Error::UpstreamUnavailable`] - transport failure, timeout or
    ///   malformed body; episodes are never invented
    pub async fn episodes(&self, slug: &str) -> Result<Vec<Episode>> {
        let listing_id = Self::listing_id(slug)?;
        let url = format!("{}/ajax/v2/episode/list/{}", self.base_url, listing_id);

        let client = self
            .client
            .clone()
            .with_header("Referer", &self.watch_url(slug));

        let payload: Value = client
            .get_json(&url)
            .await
            .map_err(|e| Error::upstream(format!("episode listing fetch failed: {}", e)))?;

        if let Some(fragment) = payload.get("html").and_then(Value::as_str) {
            Ok(parse_episode_fragment(fragment, slug))
        } else {
            Ok(normalize_episode_payload(&payload, slug))
        }
    }

    /// Fetches the per-episode server listing (sub and dub tracks).
    ///
    /// # Errors
    ///
    /// [`Error::UpstreamUnavailable`] on transport failure or a body in
    /// neither of the known shapes.
    pub async fn servers(&self, episode: u32) -> Result<ServerListing> {
        let url = format!(
            "{}/ajax/v2/episode/servers?episodeId={}",
            self.base_url, episode
        );

        let body = self
            .client
            .get_text(&url)
            .await
            .map_err(|e| Error::upstream(format!("server listing fetch failed: {}", e)))?;

        let fragment = if body.trim_start().starts_with('{') {
            let payload: Value = serde_json::from_str(&body)
                .map_err(|e| Error::upstream(format!("malformed server listing: {}", e)))?;
            payload
                .get("html")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| Error::upstream("server listing carried no html fragment"))?
        } else {
            body
        };

        Ok(parse_server_fragment(&fragment))
    }
}

/// Parses an episode-listing HTML fragment into episodes.
///
/// Episode nodes are `a.ep-item` elements carrying `data-number`,
/// `data-id`, a title and a filler marker class. Unparseable numbers
/// degrade to `None`; nothing here fails.
pub fn parse_episode_fragment(fragment: &str, slug: &str) -> Vec<Episode> {
    let document = html::parse(fragment);

    html::parse_items(&document, "a.ep-item", |el| {
        let number = el
            .value()
            .attr("data-number")
            .and_then(|n| n.trim().parse::<u32>().ok());

        let id = el
            .value()
            .attr("href")
            .and_then(|href| href.rsplit('/').next())
            .filter(|tail| tail.contains("ep="))
            .map(str::to_string)
            .or_else(|| {
                el.value()
                    .attr("data-id")
                    .map(|data_id| format!("{}?ep={}", slug, data_id))
            })
            .unwrap_or_else(|| {
                format!(
                    "{}?ep={}",
                    slug,
                    number.map(|n| n.to_string()).unwrap_or_default()
                )
            });

        let title = el
            .value()
            .attr("title")
            .map(str::to_string)
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                let name_sel = Selector::parse(".ep-name").ok()?;
                let name = el.select(&name_sel).next()?;
                name.value()
                    .attr("title")
                    .map(str::to_string)
                    .or_else(|| Some(name.text().collect::<String>().trim().to_string()))
                    .filter(|t| !t.is_empty())
            })
            .unwrap_or_else(|| {
                format!(
                    "Episode {}",
                    number.map(|n| n.to_string()).unwrap_or_default()
                )
            });

        let is_filler = el.value().classes().any(|c| c == "ssl-item-filler");

        Some(Episode {
            id,
            episode_number: number,
            title,
            is_filler,
            sub_streams: Vec::new(),
            dub_streams: Vec::new(),
            localized_streams: Vec::new(),
        })
    })
}

/// Normalizes an already-structured episode payload.
///
/// The payload is either the episode array itself or an object holding it
/// under one of the usual container names.
pub fn normalize_episode_payload(payload: &Value, slug: &str) -> Vec<Episode> {
    let entries = match payload.as_array() {
        Some(entries) => entries.clone(),
        None => json_util::first_array(payload, &["episodes", "data", "items"]),
    };

    entries
        .iter()
        .map(|entry| normalize_episode(entry, slug))
        .collect()
}

/// Normalizes one structured episode record through the candidate-field
/// policy.
pub fn normalize_episode(entry: &Value, slug: &str) -> Episode {
    let number = json_util::first_present(entry, &EPISODE_NUMBER_FIELDS)
        .and_then(|v| json_util::coerce_u32(&v))
        .or_else(|| {
            // numeric suffix of an id-like field, e.g. "one-piece-100?ep=2142"
            json_util::first_present(entry, &EPISODE_ID_FIELDS)
                .and_then(|v| v.as_str().map(str::to_string))
                .and_then(|id| {
                    id.split_once("ep=")
                        .and_then(|(_, tail)| tail.trim().parse::<u32>().ok())
                })
        });

    let id = json_util::first_present(entry, &EPISODE_ID_FIELDS)
        .and_then(|v| json_util::coerce_string(&v))
        .unwrap_or_else(|| {
            format!(
                "{}?ep={}",
                slug,
                number.map(|n| n.to_string()).unwrap_or_default()
            )
        });

    let title = json_util::first_present(entry, &EPISODE_TITLE_FIELDS)
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| {
            format!(
                "Episode {}",
                number.map(|n| n.to_string()).unwrap_or_default()
            )
        });

    let is_filler = json_util::first_present(entry, &EPISODE_FILLER_FIELDS)
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    Episode {
        id,
        episode_number: number,
        title,
        is_filler,
        sub_streams: server_refs(entry, &SUB_SERVER_FIELDS, Track::Sub),
        dub_streams: server_refs(entry, &DUB_SERVER_FIELDS, Track::Dub),
        localized_streams: Vec::new(),
    }
}

/// Normalizes a server array for one track.
///
/// Entries may be plain name strings or objects with a `name`/`server`
/// field; anything else is skipped.
fn server_refs(entry: &Value, candidates: &[&str], track: Track) -> Vec<ServerRef> {
    json_util::first_array(entry, candidates)
        .iter()
        .filter_map(|v| match v {
            Value::String(name) => Some(name.clone()),
            Value::Object(_) => json_util::first_present(v, &["name", "server"])
                .and_then(|n| n.as_str().map(str::to_string)),
            _ => None,
        })
        .map(|name| ServerRef { name, track })
        .collect()
}

/// Parses a server-listing HTML fragment into per-track server refs.
///
/// Server nodes are `.server-item` elements carrying a `data-type` of
/// `sub` or `dub` and the server's visible name. Nodes with any other
/// track type are ignored.
pub fn parse_server_fragment(fragment: &str) -> ServerListing {
    let document = html::parse(fragment);
    let mut listing = ServerListing::default();

    let nodes = html::parse_items(&document, ".server-item", |el| {
        let track = el.value().attr("data-type").map(str::to_string)?;
        let name_sel = Selector::parse("a").ok()?;
        let name = el
            .select(&name_sel)
            .next()
            .map(|a| a.text().collect::<String>())
            .unwrap_or_else(|| el.text().collect::<String>())
            .trim()
            .to_string();
        if name.is_empty() {
            return None;
        }
        Some((track, name))
    });

    for (track, name) in nodes {
        match track.as_str() {
            "sub" => listing.sub.push(ServerRef {
                name,
                track: Track::Sub,
            }),
            "dub" => listing.dub.push(ServerRef {
                name,
                track: Track::Dub,
            }),
            _ => {}
        }
    }

    listing
}
