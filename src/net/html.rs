//! HTML parsing utilities for upstream fragments and embed pages.
//!
//! This module provides convenient functions for parsing HTML content from
//! upstream sites. It uses the `scraper` crate for CSS selector-based parsing
//! and `rayon` for parallel processing of multiple elements.
//!
//! # Examples
//!
//! ```rust
//! use nagare::net::html;
//!
//! let fragment = r#"
//!     <a class="ep-item" data-number="1" href="/watch/show?ep=101">
//!         <div class="ep-name" title="Romance Dawn"></div>
//!     </a>
//! "#;
//!
//! let document = html::parse(fragment);
//! let number = html::select_attr(&document, ".ep-item", "data-number");
//! assert_eq!(number, Some("1".to_string()));
//! ```

use rayon::prelude::*;
use scraper::{Html, Selector};

/// Parses an HTML document from a string.
pub fn parse(html: &str) -> Html {
    Html::parse_document(html)
}

/// Extracts text content from the first element matching a CSS selector.
///
/// Returns `None` if no element matches or the selector is invalid.
///
/// # Examples
///
/// ```rust
/// use nagare::net::html;
///
/// let document = html::parse(r#"<h1 class="title">One Piece</h1>"#);
/// assert_eq!(html::select_text(&document, ".title"), Some("One Piece".to_string()));
/// ```
pub fn select_text(html: &Html, selector: &str) -> Option<String> {
    Selector::parse(selector).ok().and_then(|sel| {
        html.select(&sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
    })
}

/// Extracts an attribute value from the first element matching a CSS selector.
///
/// Returns `None` if no element matches, the selector is invalid, or the
/// attribute doesn't exist.
pub fn select_attr(html: &Html, selector: &str, attr: &str) -> Option<String> {
    Selector::parse(selector).ok().and_then(|sel| {
        html.select(&sel)
            .next()
            .and_then(|el| el.value().attr(attr).map(String::from))
    })
}

/// Extracts text content from all elements matching a CSS selector.
///
/// Returns an empty vector if no elements match or the selector is invalid.
pub fn select_all_text(html: &Html, selector: &str) -> Vec<String> {
    Selector::parse(selector)
        .ok()
        .map(|sel| {
            html.select(&sel)
                .map(|el| el.text().collect::<String>().trim().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Extracts attribute values from all elements matching a CSS selector.
///
/// Elements without the attribute are skipped.
///
/// # Examples
///
/// ```rust
/// use nagare::net::html;
///
/// let document = html::parse(r#"
///     <div class="servers">
///         <div class="server-item" data-type="sub">HD-1</div>
///         <div class="server-item" data-type="dub">HD-2</div>
///     </div>
/// "#);
/// let types = html::select_all_attr(&document, ".server-item", "data-type");
/// assert_eq!(types, vec!["sub", "dub"]);
/// ```
pub fn select_all_attr(html: &Html, selector: &str, attr: &str) -> Vec<String> {
    Selector::parse(selector)
        .ok()
        .map(|sel| {
            html.select(&sel)
                .filter_map(|el| el.value().attr(attr).map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Parses repeated listing nodes from HTML in parallel using rayon.
///
/// Optimized for large listing fragments (an episode list can run to over a
/// thousand nodes). Finds all elements matching the selector, converts them
/// to HTML strings, and processes them concurrently with rayon's parallel
/// iterator. Elements whose parser returns `None` are filtered out.
///
/// # Examples
///
/// ```rust
/// use nagare::net::html;
///
/// let document = html::parse(r#"
///     <a class="ep-item" data-number="1">Episode 1</a>
///     <a class="ep-item" data-number="2">Episode 2</a>
/// "#);
///
/// let numbers: Vec<String> = html::parse_items(&document, ".ep-item", |el| {
///     el.value().attr("data-number").map(String::from)
/// });
/// assert_eq!(numbers, vec!["1", "2"]);
/// ```
///
/// # Performance
///
/// The elements are first collected into HTML strings to avoid borrowing
/// issues with parallel processing; ordering of the input fragment is
/// preserved in the output.
pub fn parse_items<T, F>(html: &Html, selector: &str, parser: F) -> Vec<T>
where
    F: Fn(scraper::ElementRef) -> Option<T> + Sync,
    T: Send,
{
    Selector::parse(selector)
        .ok()
        .map(|sel| {
            // Convert ElementRef to HTML strings which can be processed in parallel
            let elements: Vec<String> = html.select(&sel).map(|el| el.html()).collect();

            elements
                .into_par_iter()
                .filter_map(|html_str| {
                    let doc = Html::parse_fragment(&html_str);
                    // parse_fragment wraps the node in a synthetic root
                    let root = doc.root_element();
                    let element = root
                        .children()
                        .filter_map(scraper::ElementRef::wrap)
                        .next()
                        .unwrap_or(root);
                    parser(element)
                })
                .collect()
        })
        .unwrap_or_default()
}
