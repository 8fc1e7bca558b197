//! Error types and result handling for Nagare operations.
//!
//! This module defines the error handling system used throughout Nagare.
//! All operations return a [`Result<T>`] which is a type alias for
//! `std::result::Result<T, Error>`.
//!
//! # Error Categories
//!
//! Errors split into two groups:
//!
//! - **Reported errors** — the four kinds that cross the [`Resolver`](crate::resolver::Resolver)
//!   boundary and are meant to reach an API caller: [`InvalidInput`](Error::InvalidInput),
//!   [`UpstreamUnavailable`](Error::UpstreamUnavailable), [`InvalidServer`](Error::InvalidServer)
//!   and [`ExtractionFailed`](Error::ExtractionFailed).
//! - **Internal errors** — transport, HTTP status, JSON and parse failures raised
//!   by lower layers. Components either convert these into a reported kind or
//!   absorb them into an empty/default value, logging via `tracing`.
//!
//! # Examples
//!
//! ```rust
//! use nagare::error::Error;
//!
//! let err = Error::invalid_server("HD-9");
//! assert!(err.is_reported());
//! assert_eq!(err.http_status(), 400);
//! ```

use thiserror::Error;

/// Type alias for Results with Nagare errors.
///
/// All public APIs in Nagare return this Result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all Nagare operations.
///
/// The first four variants are the only ones surfaced by the aggregator;
/// everything else is an internal failure that gets converted or absorbed
/// before reaching a caller.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed caller input.
    ///
    /// Carries an optional example of a valid identifier so the caller can
    /// correct the request (e.g. `one-piece-100?ep=2142`).
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        example: Option<String>,
    },

    /// The primary listing fetch failed; no episode data can be produced.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// A named server was not found in the relevant track's listing.
    #[error("Server not found: {0}")]
    InvalidServer(String),

    /// An embed page fetch failed during single-server resolution.
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// Network-related errors from HTTP operations.
    ///
    /// Wraps errors from the underlying HTTP client (reqwest), including
    /// connection timeouts and transport errors. Timeouts are not retried;
    /// a single failed attempt is final for the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A non-success HTTP status from an upstream endpoint.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// JSON serialization and deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTML/data parsing errors, such as a response that is not valid UTF-8
    /// or a fragment missing required structure.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Creates an invalid-input error without a corrective example.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: msg.into(),
            example: None,
        }
    }

    /// Creates an invalid-input error carrying an example of valid input.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nagare::error::Error;
    ///
    /// let err = Error::invalid_input_example("id is required", "one-piece-100");
    /// assert!(format!("{}", err).contains("id is required"));
    /// ```
    pub fn invalid_input_example(msg: impl Into<String>, example: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: msg.into(),
            example: Some(example.into()),
        }
    }

    /// Creates an upstream-unavailable error with the given message.
    pub fn upstream(msg: impl Into<String>) -> Self {
        Error::UpstreamUnavailable(msg.into())
    }

    /// Creates an invalid-server error naming the server that was requested.
    pub fn invalid_server(name: impl Into<String>) -> Self {
        Error::InvalidServer(name.into())
    }

    /// Creates an extraction-failed error with the given message.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Error::ExtractionFailed(msg.into())
    }

    /// Creates a parse error with the given message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Creates an HTTP status error for the given endpoint.
    pub fn status(status: u16, url: impl Into<String>) -> Self {
        Error::Status {
            status,
            url: url.into(),
        }
    }

    /// Returns `true` for the four error kinds that are surfaced to callers.
    ///
    /// Everything else is an internal failure that components convert or
    /// absorb before it reaches the aggregator boundary.
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput { .. }
                | Error::UpstreamUnavailable(_)
                | Error::InvalidServer(_)
                | Error::ExtractionFailed(_)
        )
    }

    /// Maps this error to the HTTP status a routing layer should respond with.
    ///
    /// Reported kinds map to 4xx; internal failures map to a generic 5xx so
    /// no internal detail leaks to the caller.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::InvalidInput { .. } => 400,
            Error::InvalidServer(_) => 400,
            Error::UpstreamUnavailable(_) => 404,
            Error::ExtractionFailed(_) => 404,
            Error::Network(_) | Error::Status { .. } => 502,
            Error::Json(_) | Error::Parse(_) => 500,
        }
    }
}
