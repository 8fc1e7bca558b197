//! Explicit configuration threaded into every component at construction.
//!
//! Nothing in Nagare reads the environment: a [`Config`] value is handed to
//! [`Resolver::new`](crate::resolver::Resolver::new) and from there into each
//! component. Defaults target the production upstreams; deployments can
//! deserialize an override from JSON.
//!
//! # Examples
//!
//! ```rust
//! use nagare::config::{Config, LocalizedStrategy};
//!
//! let config = Config::default()
//!     .with_concurrency(4)
//!     .with_localized_strategy(LocalizedStrategy::Api);
//! assert_eq!(config.concurrency, 4);
//! ```

use serde::Deserialize;
use std::time::Duration;

/// Default cap on concurrently in-flight secondary lookups.
pub const DEFAULT_CONCURRENCY: usize = 6;

/// Top-level configuration for a [`Resolver`](crate::resolver::Resolver).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Primary listing source.
    pub primary: PrimaryConfig,

    /// Third-party title-search catalog.
    pub catalog: CatalogConfig,

    /// Secondary localized-dub provider.
    pub localized: LocalizedConfig,

    /// Fan-out worker cap; never exceeds the episode count.
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary: PrimaryConfig::default(),
            catalog: CatalogConfig::default(),
            localized: LocalizedConfig::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Config {
    /// Override the primary source base URL.
    pub fn with_primary_base_url(mut self, url: impl Into<String>) -> Self {
        self.primary.base_url = url.into();
        self
    }

    /// Override the localized provider base URL.
    pub fn with_localized_base_url(mut self, url: impl Into<String>) -> Self {
        self.localized.base_url = url.into();
        self
    }

    /// Select the localized sourcing strategy.
    pub fn with_localized_strategy(mut self, strategy: LocalizedStrategy) -> Self {
        self.localized.strategy = strategy;
        self
    }

    /// Set the fan-out worker cap.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

/// Primary listing source endpoints and timeout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PrimaryConfig {
    /// Base URL of the primary site, no trailing slash.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for PrimaryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://hianime.to".to_string(),
            timeout_secs: 10,
        }
    }
}

impl PrimaryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Title-search catalog endpoint and timeout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// GraphQL endpoint of the catalog service.
    pub graphql_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            graphql_url: "https://graphql.anilist.co".to_string(),
            timeout_secs: 8,
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How the localized-dub track is sourced.
///
/// The embed-scrape strategy keyed by the resolved external id is the
/// primary strategy; the JSON API variant stays available behind
/// configuration. Exactly one runs per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalizedStrategy {
    /// Scrape the provider's embed page for `{externalId}/{episode}`.
    #[default]
    Embed,
    /// Read the provider's per-show JSON payload.
    Api,
}

/// Secondary localized-dub provider endpoints and timeout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalizedConfig {
    /// Sourcing strategy to run.
    pub strategy: LocalizedStrategy,

    /// Base URL of the provider, no trailing slash.
    pub base_url: String,

    /// Audio-track path segment on the provider's embed pages.
    pub track: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LocalizedConfig {
    fn default() -> Self {
        Self {
            strategy: LocalizedStrategy::Embed,
            base_url: "https://vidnest.fun".to_string(),
            track: "hindi".to_string(),
            timeout_secs: 10,
        }
    }
}

impl LocalizedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
