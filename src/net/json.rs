//! JSON extraction utilities for loosely-shaped upstream payloads.
//!
//! This module provides convenient functions for extracting data from nested
//! JSON structures returned by upstream services. It supports dot notation
//! for navigating nested objects, plus the ordered candidate-field lookups
//! used against upstreams that name the same field several different ways.
//!
//! Heterogeneous field naming is an external-interface instability, not a
//! defect to normalize away upstream: each record is tried against an
//! explicit, ordered list of candidate field names, and the first present
//! candidate wins.
//!
//! # Examples
//!
//! ```rust
//! use nagare::net::json;
//! use serde_json::json;
//!
//! let entry = json!({ "episode": "12", "links": ["https://a/v.m3u8"] });
//!
//! let number = json::first_present(&entry, &["episodeNumber", "episode", "number"]);
//! assert_eq!(json::coerce_u32(&number.unwrap()), Some(12));
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Extracts a value from nested JSON using dot notation.
///
/// Navigates through nested objects using a dot-separated path, e.g.
/// `"data.Media.id"`. Returns `None` if any part of the path doesn't exist.
///
/// # Examples
///
/// ```rust
/// use nagare::net::json;
/// use serde_json::json;
///
/// let data = json!({ "data": { "Media": { "id": 21 } } });
/// let id = json::extract_path(&data, "data.Media.id");
/// assert_eq!(id.unwrap().as_u64(), Some(21));
/// ```
pub fn extract_path(json: &Value, path: &str) -> Option<Value> {
    let mut current = json;

    for key in path.split('.') {
        current = current.get(key)?;
    }

    Some(current.clone())
}

/// Extracts and deserializes a value from a nested JSON path.
///
/// # Errors
///
/// * [`Error::Parse`](crate::Error::Parse) - If the path doesn't exist
/// * [`Error::Json`](crate::Error::Json) - If deserialization fails
pub fn extract_as<T>(json: &Value, path: &str) -> crate::Result<T>
where
    T: DeserializeOwned,
{
    extract_path(json, path)
        .ok_or_else(|| crate::Error::parse(format!("Path not found: {}", path)))
        .and_then(|v| serde_json::from_value(v).map_err(Into::into))
}

/// Extracts an array from a nested JSON path.
///
/// Returns an empty vector if the path doesn't exist, the value is not an
/// array, or the array is empty.
pub fn extract_array(json: &Value, path: &str) -> Vec<Value> {
    extract_path(json, path)
        .and_then(|v| v.as_array().cloned())
        .unwrap_or_default()
}

/// Returns the value of the first present candidate field, in order.
///
/// Candidates may use dot notation. `null` values count as absent, so a
/// record carrying `"episode": null` falls through to the next candidate.
///
/// # Examples
///
/// ```rust
/// use nagare::net::json;
/// use serde_json::json;
///
/// let record = json!({ "episode": null, "number": 7 });
/// let v = json::first_present(&record, &["episodeNumber", "episode", "number"]);
/// assert_eq!(v.unwrap().as_u64(), Some(7));
/// ```
pub fn first_present(json: &Value, candidates: &[&str]) -> Option<Value> {
    candidates
        .iter()
        .filter_map(|path| extract_path(json, path))
        .find(|v| !v.is_null())
}

/// Returns the first present candidate that holds a non-empty array.
///
/// Used for container fields (`streams`, `links`, `sources`, ...) where an
/// upstream may carry several of the candidates but populate only one.
pub fn first_array(json: &Value, candidates: &[&str]) -> Vec<Value> {
    candidates
        .iter()
        .map(|path| extract_array(json, path))
        .find(|arr| !arr.is_empty())
        .unwrap_or_default()
}

/// Coerces a JSON number or numeric string into a `u32`.
///
/// Fractional numbers and non-numeric strings yield `None`.
pub fn coerce_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Renders a JSON number or string as a plain string for coerced equality
/// comparisons.
///
/// Upstream episode-number fields are matched against the requested number
/// by string equality after coercion, so `7`, `"7"` and `7.0` from an
/// integer-typed field all compare equal to a requested `7`.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.trim().to_string()),
        _ => None,
    }
}
