//! Markdown image link rewriting.
//!
//! Replaces the target of every `![alt](url)` whose URL has a known
//! replacement, anywhere in the document. Unknown links are re-emitted with
//! the whitespace inside the parentheses trimmed and are otherwise untouched.

use std::collections::HashMap;

use regex::Captures;
use serde::Serialize;
use tracing::debug;

use crate::parser::IMAGE_LINK_PATTERN;

/// A badge URL and the path that replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeMapping {
    /// Original badge URL, compared byte-for-byte against the document.
    pub url: String,
    /// Replacement link target.
    pub path: String,
}

impl BadgeMapping {
    /// Creates a mapping from `url` to `path`.
    pub fn new(url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
        }
    }
}

/// Rewrites every markdown image link whose URL appears in `mappings`.
///
/// The alt text is kept exactly, including internal whitespace. URL matching
/// is byte-exact with no normalization. When the same URL is mapped twice the
/// later entry wins.
///
/// # Examples
///
/// ```
/// use badge_compile_core::rewrite::{BadgeMapping, replace_badge_urls};
///
/// let out = replace_badge_urls(
///     "[![ci](https://ci.example/b.svg)](https://ci.example)",
///     &[BadgeMapping::new("https://ci.example/b.svg", "badges/badge-0.svg")],
/// );
/// assert_eq!(out, "[![ci](badges/badge-0.svg)](https://ci.example)");
/// ```
#[must_use]
pub fn replace_badge_urls(input: &str, mappings: &[BadgeMapping]) -> String {
    let lookup: HashMap<&str, &str> = mappings
        .iter()
        .map(|m| (m.url.as_str(), m.path.as_str()))
        .collect();

    let mut replaced = 0usize;
    let output = IMAGE_LINK_PATTERN.replace_all(input, |caps: &Captures<'_>| {
        let alt = &caps[1];
        let url = &caps[2];
        match lookup.get(url) {
            Some(path) => {
                replaced += 1;
                format!("![{alt}]({path})")
            }
            None => format!("![{alt}]({url})"),
        }
    });

    debug!(replaced, "rewrote badge links");
    output.into_owned()
}
