//! Identity resolution between the primary source's slug space and the
//! external catalog's id space.
//!
//! The secondary localized-dub provider indexes shows by a numeric catalog
//! id rather than the primary source's slug. The mapping is recomputed per
//! request: derive a search title from the slug, then ask the catalog's
//! GraphQL search for its best match. A failed resolution is a normal
//! outcome ([`None`]), never an error.

use serde_json::{Value, json};
use tracing::debug;

use crate::config::CatalogConfig;
use crate::net::{HttpClient, json as json_util};

const SEARCH_QUERY: &str = "
query ($search: String) {
  Media(search: $search, type: ANIME) {
    id
    title { romaji english native }
  }
}
";

/// Derives a human-readable search title from an opaque show slug.
///
/// Strips any query suffix, then a trailing purely-numeric token (the
/// embedded listing id), then a trailing `season <N>` token pair, and joins
/// the remaining tokens with single spaces. Pure and total: any input
/// yields some string, possibly empty.
///
/// # Examples
///
/// ```rust
/// use nagare::identity::title_from_slug;
///
/// assert_eq!(title_from_slug("one-piece-100"), "one piece");
/// assert_eq!(title_from_slug("attack-on-titan-season-2-5"), "attack on titan");
/// ```
pub fn title_from_slug(slug: &str) -> String {
    let trimmed = slug
        .split('?')
        .next()
        .and_then(|s| s.split("::").next())
        .unwrap_or(slug);

    let mut parts: Vec<&str> = trimmed.split('-').filter(|p| !p.is_empty()).collect();

    let is_numeric = |s: &str| s.chars().all(|c| c.is_ascii_digit());

    if parts.last().is_some_and(|p| is_numeric(p)) {
        parts.pop();
    }

    if parts.len() >= 2
        && parts[parts.len() - 2].eq_ignore_ascii_case("season")
        && is_numeric(parts[parts.len() - 1])
    {
        parts.truncate(parts.len() - 2);
    }

    parts.join(" ")
}

/// Resolves show titles to the external catalog's numeric id.
///
/// Issues a single GraphQL search per call and takes the first match. All
/// failure modes (transport error, timeout, missing field, no match)
/// collapse to `None`: localized-track operations degrade rather than fail
/// when the catalog is unreachable.
pub struct IdentityResolver {
    client: HttpClient,
    url: String,
}

impl IdentityResolver {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            client: HttpClient::new("catalog")
                .with_timeout(config.timeout())
                .with_header("Accept", "application/json"),
            url: config.graphql_url.clone(),
        }
    }

    /// Looks up the catalog id for a search title.
    ///
    /// Returns `None` for empty titles without issuing a request.
    pub async fn resolve(&self, title: &str) -> Option<u64> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }

        let body = json!({
            "query": SEARCH_QUERY,
            "variables": { "search": title },
        });

        match self.client.post_json::<Value>(&self.url, &body).await {
            Ok(response) => {
                let id = json_util::extract_path(&response, "data.Media.id")
                    .and_then(|v| v.as_u64());
                if id.is_none() {
                    debug!(title, "catalog search returned no match");
                }
                id
            }
            Err(e) => {
                debug!(title, error = %e, "catalog lookup failed");
                None
            }
        }
    }
}
