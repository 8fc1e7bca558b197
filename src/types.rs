//! Core data types for episodes, servers, stream links and queries.
//!
//! This module defines the fundamental data structures used throughout Nagare:
//!
//! - [`Episode`] - One episode of a show with its per-track stream listings
//! - [`ServerRef`] - A named upstream provider, not yet resolved to a URL
//! - [`StreamLink`] - A playable (or embeddable) absolute URL
//! - [`StreamQuery`] - Parameters for a get-streams request
//! - [`StreamResponse`] - The listing-mode / resolved-mode response union
//!
//! All response-shaped types serialize with camelCase field names, matching
//! the wire format a routing layer is expected to expose.
//!
//! # Examples
//!
//! ```rust
//! use nagare::types::{StreamQueryBuilder, TrackFilter};
//!
//! let query = StreamQueryBuilder::default()
//!     .id("one-piece-100?ep=2142")
//!     .track(TrackFilter::Sub)
//!     .server(Some("HD-1".to_string()))
//!     .build()
//!     .unwrap();
//! assert_eq!(query.track, TrackFilter::Sub);
//! ```

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Audio track variant a server provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Sub,
    Dub,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Sub => write!(f, "sub"),
            Track::Dub => write!(f, "dub"),
        }
    }
}

/// Requested track type for a get-streams call.
///
/// Parsed case-insensitively from the `type` query parameter; the default
/// is [`All`](TrackFilter::All).
///
/// # Examples
///
/// ```rust
/// use nagare::types::TrackFilter;
///
/// assert_eq!("DUB".parse::<TrackFilter>().unwrap(), TrackFilter::Dub);
/// assert_eq!(TrackFilter::default(), TrackFilter::All);
/// assert!("bluray".parse::<TrackFilter>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackFilter {
    #[default]
    All,
    Sub,
    Dub,
    Localized,
}

impl FromStr for TrackFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TrackFilter::All),
            "sub" => Ok(TrackFilter::Sub),
            "dub" => Ok(TrackFilter::Dub),
            "localized" => Ok(TrackFilter::Localized),
            other => Err(Error::invalid_input_example(
                format!("unknown track type '{}'", other),
                "type=sub",
            )),
        }
    }
}

impl fmt::Display for TrackFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackFilter::All => write!(f, "all"),
            TrackFilter::Sub => write!(f, "sub"),
            TrackFilter::Dub => write!(f, "dub"),
            TrackFilter::Localized => write!(f, "localized"),
        }
    }
}

/// A reference to a playable source, not yet resolved to a URL.
///
/// Identity is `(name, track)` within one episode. Matching against a
/// requested server name is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRef {
    /// Display name of the server, e.g. `HD-1`.
    pub name: String,

    /// Which audio track this server carries.
    pub track: Track,
}

impl ServerRef {
    /// Case-insensitive match against a requested server name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nagare::types::{ServerRef, Track};
    ///
    /// let server = ServerRef { name: "HD-1".to_string(), track: Track::Sub };
    /// assert!(server.matches_name("hd-1"));
    /// assert!(!server.matches_name("HD-2"));
    /// ```
    pub fn matches_name(&self, requested: &str) -> bool {
        self.name.eq_ignore_ascii_case(requested.trim())
    }
}

/// A playable or embeddable media location.
///
/// The `url` is always absolute: relative references harvested from scraped
/// pages are resolved against the page's base URL before construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamLink {
    /// Absolute media or embed URL.
    pub url: String,

    /// Tag describing how the link was found (`embed`, `video`, `m3u8`,
    /// anchor text, ...), or `None` when the source carried no label.
    pub title: Option<String>,
}

impl StreamLink {
    pub fn new(url: impl Into<String>, title: Option<String>) -> Self {
        Self {
            url: url.into(),
            title,
        }
    }

    /// The synthetic fallback link returned when a page fetch succeeded but
    /// no stream candidates were recovered from it.
    pub fn page(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: Some("page".to_string()),
        }
    }
}

/// One episode of a show as projected for a list-episodes response.
///
/// Purely a response-time projection; nothing is persisted. `episode_number`
/// degrades to `None` when the upstream value cannot be parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    /// Unique identifier within a show, e.g. `one-piece-100?ep=2142`.
    pub id: String,

    /// Episode number, or `None` when unresolvable.
    pub episode_number: Option<u32>,

    /// Episode title.
    pub title: String,

    /// Whether the episode is marked as filler by the primary source.
    pub is_filler: bool,

    /// Sub-track servers listed for this episode.
    #[serde(default)]
    pub sub_streams: Vec<ServerRef>,

    /// Dub-track servers listed for this episode.
    #[serde(default)]
    pub dub_streams: Vec<ServerRef>,

    /// Localized-dub stream links attached by the secondary source.
    #[serde(default)]
    pub localized_streams: Vec<StreamLink>,
}

/// Per-track server/link listing for one episode (`type=all` payload).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerListing {
    #[serde(default)]
    pub sub: Vec<ServerRef>,
    #[serde(default)]
    pub dub: Vec<ServerRef>,
    #[serde(default)]
    pub localized: Vec<StreamLink>,
}

/// Result of a get-streams call.
///
/// Listing mode returns every track's servers/links without resolving final
/// URLs; resolved mode returns the stream links of one selected server.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StreamResponse {
    Listing {
        servers: ServerListing,
    },
    Resolved {
        server: String,
        streams: Vec<StreamLink>,
    },
}

/// Parameters for a get-streams request.
///
/// Built either directly or through the generated [`StreamQueryBuilder`].
///
/// # Examples
///
/// ```rust
/// use nagare::types::{StreamQueryBuilder, TrackFilter};
///
/// let query = StreamQueryBuilder::default()
///     .id("attack-on-titan-112?ep=3304")
///     .build()
///     .unwrap();
/// assert_eq!(query.track, TrackFilter::All);
/// assert!(query.server.is_none());
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct StreamQuery {
    /// Episode identifier, `"{slug}?ep={n}"`.
    pub id: String,

    /// Requested track type; defaults to `all`.
    #[builder(default)]
    pub track: TrackFilter,

    /// Optional server name, matched case-insensitively.
    #[builder(default)]
    pub server: Option<String>,
}

/// Parsed form of the `id` request parameter.
///
/// The raw identifier must carry an `ep=` marker; requests without one are
/// rejected before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeId {
    /// Primary-source show slug, e.g. `one-piece-100`.
    pub slug: String,

    /// Episode key within the show, the value after `ep=`.
    pub episode: u32,
}

impl EpisodeId {
    /// Parses a raw `id` parameter into its slug and episode parts.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] when the identifier is empty, lacks the
    /// `ep=` marker, or the episode value is not a number.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nagare::types::EpisodeId;
    ///
    /// let id = EpisodeId::parse("one-piece-100?ep=2142").unwrap();
    /// assert_eq!(id.slug, "one-piece-100");
    /// assert_eq!(id.episode, 2142);
    ///
    /// assert!(EpisodeId::parse("one-piece-100").is_err());
    /// ```
    pub fn parse(raw: &str) -> crate::Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::invalid_input_example(
                "id is required",
                "one-piece-100?ep=2142",
            ));
        }

        let Some((_, after)) = raw.split_once("ep=") else {
            return Err(Error::invalid_input_example(
                "episode id is not valid (expected ep=...)",
                "one-piece-100?ep=2142",
            ));
        };

        let episode = after
            .split('&')
            .next()
            .unwrap_or(after)
            .trim()
            .parse::<u32>()
            .map_err(|_| {
                Error::invalid_input_example(
                    format!("episode number '{}' is not numeric", after),
                    "one-piece-100?ep=2142",
                )
            })?;

        let slug = raw.split('?').next().unwrap_or(raw).to_string();

        Ok(Self { slug, episode })
    }
}

impl FromStr for EpisodeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EpisodeId::parse(s)
    }
}
