//! # Nagare - Unified anime stream resolution library
//!
//! Nagare resolves, for a given show and episode, the set of playable video
//! streams across multiple independent upstream sources: a primary site
//! exposing sub/dub servers through semi-structured HTML, and a secondary
//! provider carrying a localized-dub track keyed by a different identifier
//! space. It is built on tokio and provides best-effort normalization with
//! explicit, typed degradation - a flaky upstream shrinks a response, it
//! does not fail it.
//!
//! ## Features
//!
//! - **Two public operations**: list a show's episodes, or resolve the
//!   streams for one episode and track
//! - **Cross-source identity**: slugs are mapped to the external catalog's
//!   numeric ids through a best-effort title search, recomputed per request
//! - **Shape-tolerant normalization**: every upstream field is read through
//!   an ordered candidate-field policy; HTML and JSON response shapes are
//!   normalized behind one interface
//! - **Multi-strategy extraction**: embed pages are scraped with layered
//!   heuristics (iframes, video sources, media anchors, script sweeps)
//! - **Bounded fan-out**: per-episode secondary lookups run under a
//!   concurrency cap with index-aligned results and isolated failures
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nagare::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> nagare::Result<()> {
//!     let resolver = Resolver::new(Config::default());
//!
//!     // List a show's episodes, localized links attached per episode
//!     let episodes = resolver.list_episodes("one-piece-100").await?;
//!     println!("found {} episodes", episodes.len());
//!
//!     // Resolve one server's playable streams
//!     let query = StreamQueryBuilder::default()
//!         .id("one-piece-100?ep=2142")
//!         .track(TrackFilter::Sub)
//!         .server(Some("HD-1".to_string()))
//!         .build()
//!         .unwrap();
//!
//!     match resolver.get_streams(&query).await? {
//!         StreamResponse::Resolved { server, streams } => {
//!             println!("{}: {} streams", server, streams.len());
//!         }
//!         StreamResponse::Listing { servers } => {
//!             println!("{} sub servers", servers.sub.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`resolver`]: Aggregator composing the components into the public operations
//! - [`primary`]: Primary listing fetcher (episode and server listings)
//! - [`identity`]: Slug-to-catalog-id resolution
//! - [`localized`]: Secondary localized-dub providers (API or embed scrape)
//! - [`extract`]: Multi-strategy embed page extraction
//! - [`fanout`]: Bounded fan-out executor
//! - [`types`]: Core data structures for episodes, servers and stream links
//! - [`net`]: HTTP client and parsing utilities
//! - [`config`]: Explicit configuration threaded into each component
//! - [`error`]: Error handling and reported-error taxonomy
//!
//! ## Degradation model
//!
//! Only four error kinds are surfaced to callers: invalid input, an
//! unavailable primary listing, an unknown server name, and a failed embed
//! extraction. Everything else - an unresolved identity mapping outside an
//! exclusive localized request, an empty upstream stream list, a malformed
//! individual episode record - is logged and converted to an empty value at
//! the component that observed it.

pub mod config;
pub mod error;
pub mod extract;
pub mod fanout;
pub mod identity;
pub mod localized;
pub mod net;
pub mod primary;
pub mod resolver;
pub mod types;

/// Prelude module for convenient imports.
///
/// Re-exports the most commonly used types, allowing you to import
/// everything you need with a single `use nagare::prelude::*;` statement.
pub mod prelude {
    pub use crate::{
        config::{Config, LocalizedStrategy},
        identity::title_from_slug,
        resolver::Resolver,
        types::{
            Episode, EpisodeId, ServerListing, ServerRef, StreamLink, StreamQuery,
            StreamQueryBuilder, StreamResponse, Track, TrackFilter,
        },
    };
}

// Re-export main types at crate root for direct access
pub use config::Config;
pub use error::{Error, Result};
pub use resolver::Resolver;
pub use types::{
    Episode, EpisodeId, ServerListing, ServerRef, StreamLink, StreamQuery, StreamQueryBuilder,
    StreamResponse, Track, TrackFilter,
};
