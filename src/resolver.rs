//! Aggregation of the primary listing, identity resolution, localized
//! lookups and embed extraction into the two public operations.
//!
//! [`Resolver::list_episodes`] produces the show's episode listing with
//! localized links attached per episode; [`Resolver::get_streams`] answers a
//! stream query in either listing mode or resolved mode. Only the four
//! reported error kinds cross this boundary; every other failure has already
//! been absorbed into a typed empty value by the component that observed it.

use tracing::warn;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::extract::EmbedExtractor;
use crate::fanout::map_bounded;
use crate::identity::{IdentityResolver, title_from_slug};
use crate::localized::{LocalizedProvider, provider_for};
use crate::primary::PrimaryClient;
use crate::types::{
    Episode, EpisodeId, ServerListing, StreamLink, StreamQuery, StreamResponse, TrackFilter,
};

/// Composes the per-source clients into the crate's public operations.
///
/// A `Resolver` is cheap to keep around and shares nothing mutable across
/// requests; concurrency is scoped inside each call.
///
/// # Examples
///
/// ```rust,no_run
/// use nagare::prelude::*;
///
/// # #[tokio::main]
/// # async fn main() -> nagare::Result<()> {
/// let resolver = Resolver::new(Config::default());
///
/// let episodes = resolver.list_episodes("one-piece-100").await?;
/// println!("{} episodes", episodes.len());
///
/// let query = StreamQueryBuilder::default()
///     .id("one-piece-100?ep=2142")
///     .track(TrackFilter::Sub)
///     .server(Some("HD-1".to_string()))
///     .build()
///     .unwrap();
/// let streams = resolver.get_streams(&query).await?;
/// # Ok(())
/// # }
/// ```
pub struct Resolver {
    config: Config,
    primary: PrimaryClient,
    identity: IdentityResolver,
    localized: Box<dyn LocalizedProvider>,
    extractor: EmbedExtractor,
}

impl Resolver {
    pub fn new(config: Config) -> Self {
        let primary = PrimaryClient::new(&config.primary);
        let identity = IdentityResolver::new(&config.catalog);
        let localized = provider_for(&config.localized);
        let extractor = EmbedExtractor::new(&config.primary);
        Self {
            config,
            primary,
            identity,
            localized,
            extractor,
        }
    }

    /// Lists a show's episodes in the primary source's listing order, each
    /// with its localized links attached.
    ///
    /// Identity resolution happens once per call. When it fails, every
    /// episode keeps an empty localized list; per-episode lookup failures
    /// are isolated by the fan-out executor and degrade the same way. Index
    /// alignment between the fan-out results and the episode list is
    /// preserved even under partial failures.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidInput`] - empty or malformed slug
    /// * [`Error::UpstreamUnavailable`] - the primary listing fetch failed
    pub async fn list_episodes(&self, slug: &str) -> Result<Vec<Episode>> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(Error::invalid_input_example(
                "id is required",
                "one-piece-100",
            ));
        }

        let mut episodes = self.primary.episodes(slug).await?;

        if let Some(external_id) = self.identity.resolve(&title_from_slug(slug)).await {
            let numbers: Vec<Option<u32>> =
                episodes.iter().map(|ep| ep.episode_number).collect();
            let provider = self.localized.as_ref();

            let localized = map_bounded(
                numbers,
                self.config.concurrency,
                move |number, _| async move {
                    match number {
                        Some(n) => Ok(provider.streams(external_id, n).await),
                        None => Ok(Vec::new()),
                    }
                },
            )
            .await;

            for (episode, links) in episodes.iter_mut().zip(localized) {
                episode.localized_streams = links;
            }
        }

        Ok(episodes)
    }

    /// Answers a stream query in listing mode (`type=all`) or resolved mode
    /// (a named server, or the localized track).
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidInput`] - malformed id, unknown track, or an
    ///   unresolvable identity mapping when the localized track was
    ///   exclusively requested
    /// * [`Error::UpstreamUnavailable`] - server listing fetch failed on a
    ///   sub/dub request
    /// * [`Error::InvalidServer`] - named server missing from the track's
    ///   listing
    /// * [`Error::ExtractionFailed`] - embed page fetch failed during
    ///   single-server resolution
    pub async fn get_streams(&self, query: &StreamQuery) -> Result<StreamResponse> {
        let episode_id = EpisodeId::parse(&query.id)?;

        match query.track {
            TrackFilter::All => {
                // best-effort listing; each track degrades independently
                let mut servers = match self.primary.servers(episode_id.episode).await {
                    Ok(listing) => listing,
                    Err(e) => {
                        warn!(error = %e, "server listing unavailable for type=all");
                        ServerListing::default()
                    }
                };
                servers.localized = self
                    .localized_links(&episode_id)
                    .await
                    .unwrap_or_default();
                Ok(StreamResponse::Listing { servers })
            }

            TrackFilter::Sub | TrackFilter::Dub => {
                let listing = self.primary.servers(episode_id.episode).await?;
                let track_servers = match query.track {
                    TrackFilter::Sub => &listing.sub,
                    _ => &listing.dub,
                };

                let Some(name) = query.server.as_deref().map(str::trim).filter(|s| !s.is_empty())
                else {
                    return Err(Error::invalid_server(format!(
                        "server is required for type={}",
                        query.track
                    )));
                };

                let Some(server) = track_servers.iter().find(|s| s.matches_name(name)) else {
                    return Err(Error::invalid_server(name));
                };

                let streams = self.extractor.extract(server, episode_id.episode).await?;
                Ok(StreamResponse::Resolved {
                    server: server.name.clone(),
                    streams,
                })
            }

            TrackFilter::Localized => {
                let external_id = self
                    .identity
                    .resolve(&title_from_slug(&episode_id.slug))
                    .await
                    .ok_or_else(|| {
                        Error::invalid_input_example(
                            "no catalog match for show; localized track unavailable",
                            "one-piece-100?ep=2142",
                        )
                    })?;

                let streams = self.localized.streams(external_id, episode_id.episode).await;
                if streams.is_empty() {
                    return Err(Error::extraction("no localized streams recovered"));
                }

                if let Some(name) = query.server.as_deref() {
                    if let Some(link) = streams.iter().find(|l| {
                        l.title
                            .as_deref()
                            .is_some_and(|t| t.eq_ignore_ascii_case(name.trim()))
                    }) {
                        return Ok(StreamResponse::Resolved {
                            server: name.trim().to_string(),
                            streams: vec![link.clone()],
                        });
                    }
                }

                Ok(StreamResponse::Resolved {
                    server: self.localized.label(),
                    streams,
                })
            }
        }
    }

    /// Localized links for one episode, `None` when the identity mapping
    /// does not resolve. Absence is a normal outcome everywhere except an
    /// exclusive `type=localized` request.
    async fn localized_links(&self, id: &EpisodeId) -> Option<Vec<StreamLink>> {
        let external_id = self.identity.resolve(&title_from_slug(&id.slug)).await?;
        Some(self.localized.streams(external_id, id.episode).await)
    }
}
