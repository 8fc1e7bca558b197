//! Network utilities for HTTP requests, politeness delays, and content parsing.
//!
//! This module provides the networking infrastructure for Nagare, including:
//!
//! - **HTTP Client**: A global, configured HTTP client with connection pooling
//! - **Politeness Delay**: Per-source spacing between outbound requests
//! - **Content Parsing**: HTML and JSON parsing utilities
//!
//! Requests are never retried: a failed attempt is final for the calling
//! request, and each caller's boundary decides whether that degrades to a
//! typed empty value or a reported error.
//!
//! # Examples
//!
//! ```rust
//! use nagare::net::HttpClient;
//! use std::time::Duration;
//!
//! # async fn example() -> nagare::Result<()> {
//! let client = HttpClient::new("primary")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_header("Referer", "https://example.com/watch/one-piece-100");
//!
//! let html = client.get_text("https://example.com/ajax/v2/episode/list/100").await?;
//! let json: serde_json::Value = client.get_json("https://api.example.com").await?;
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use reqwest::{Client, header::HeaderMap};
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub mod html;
pub mod json;

/// Global HTTP client instance with optimized configuration.
///
/// Configured with connection pooling (10 idle connections per host),
/// compression support (gzip, brotli) and a custom User-Agent header.
/// Timeouts are applied per request from each [`HttpClient`]'s
/// configuration rather than globally.
///
/// The client is created lazily on first use and reused across all HTTP
/// operations.
static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("Nagare/0.1.0")
        .pool_max_idle_per_host(10)
        .gzip(true)
        .brotli(true)
        .build()
        .expect("Failed to build HTTP client")
});

/// Per-source spacing between outbound requests.
///
/// Tracks the last request time for each source and enforces a minimum
/// delay between requests to the same upstream, so a fan-out over many
/// episodes does not hammer one host.
///
/// # Thread Safety
///
/// Uses a `Mutex` internally and is safe to use across multiple threads
/// and async tasks.
#[derive(Debug)]
pub struct RateLimiter {
    last_request: Mutex<HashMap<String, Instant>>,
    default_delay: Duration,
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            last_request: Mutex::new(HashMap::new()),
            default_delay: self.default_delay,
        }
    }
}

impl RateLimiter {
    /// Creates a new rate limiter with the specified delay between requests.
    pub fn new(delay_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(HashMap::new()),
            default_delay: Duration::from_millis(delay_ms),
        }
    }

    /// Waits if necessary before allowing a request for the specified source.
    pub async fn wait(&self, source_id: &str) {
        let now = Instant::now();
        let wait_duration = {
            let last_map = self.last_request.lock();
            if let Some(&last) = last_map.get(source_id) {
                let elapsed = now.duration_since(last);
                if elapsed < self.default_delay {
                    Some(self.default_delay - elapsed)
                } else {
                    None
                }
            } else {
                None
            }
        };

        if let Some(duration) = wait_duration {
            tokio::time::sleep(duration).await;
        }

        self.last_request
            .lock()
            .insert(source_id.to_string(), Instant::now());
    }
}

/// HTTP client wrapper with per-source politeness delay and explicit timeout.
///
/// `HttpClient` provides a high-level interface for GET requests against one
/// upstream source. Each client carries its own header set and timeout, and
/// spaces its requests through a [`RateLimiter`].
///
/// # Examples
///
/// ```rust
/// use nagare::net::HttpClient;
/// use std::time::Duration;
///
/// let client = HttpClient::new("localized")
///     .with_timeout(Duration::from_secs(10))
///     .with_rate_limit(250);
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    source_id: String,
    rate_limiter: RateLimiter,
    timeout: Duration,
    headers: HeaderMap,
}

impl HttpClient {
    /// Creates a new HTTP client for the specified source.
    ///
    /// Defaults: 10-second timeout, 200ms politeness delay.
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            rate_limiter: RateLimiter::new(200),
            timeout: Duration::from_secs(10),
            headers: HeaderMap::new(),
        }
    }

    /// Sets the politeness delay for this client.
    pub fn with_rate_limit(mut self, delay_ms: u64) -> Self {
        self.rate_limiter = RateLimiter::new(delay_ms);
        self
    }

    /// Sets the per-request timeout for this client.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a custom header to all requests made by this client.
    ///
    /// Invalid header names or values are silently skipped.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            name.parse::<reqwest::header::HeaderName>(),
            value.parse::<reqwest::header::HeaderValue>(),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Performs a single GET request with rate limiting and timeout.
    ///
    /// # Errors
    ///
    /// * [`Error::Status`](crate::Error::Status) - For non-success HTTP statuses
    /// * [`Error::Network`](crate::Error::Network) - For network, TLS or timeout errors
    pub async fn get(&self, url: &str) -> crate::Result<Bytes> {
        self.rate_limiter.wait(&self.source_id).await;

        let response = CLIENT
            .get(url)
            .headers(self.headers.clone())
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(crate::Error::status(response.status().as_u16(), url));
        }

        Ok(response.bytes().await?)
    }

    /// Performs a GET request and returns the response as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// * All errors from [`get()`](HttpClient::get)
    /// * [`Error::Parse`](crate::Error::Parse) - If the response is not valid UTF-8
    pub async fn get_text(&self, url: &str) -> crate::Result<String> {
        let bytes = self.get(url).await?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| crate::Error::parse(format!("Invalid UTF-8: {}", e)))
    }

    /// Performs a GET request and deserializes the response as JSON.
    ///
    /// # Errors
    ///
    /// * All errors from [`get()`](HttpClient::get)
    /// * [`Error::Json`](crate::Error::Json) - If JSON parsing fails
    pub async fn get_json<T>(&self, url: &str) -> crate::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let bytes = self.get(url).await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    /// Performs a POST request with a JSON body and deserializes the JSON
    /// response.
    ///
    /// Used by the identity resolver for its GraphQL query; everything else
    /// in the crate is GET-shaped.
    pub async fn post_json<T>(&self, url: &str, body: &serde_json::Value) -> crate::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.rate_limiter.wait(&self.source_id).await;

        let response = CLIENT
            .post(url)
            .headers(self.headers.clone())
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(crate::Error::status(response.status().as_u16(), url));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }
}
