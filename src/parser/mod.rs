//! Badge extraction from markdown input.
//!
//! Scanning happens in two independent passes so each can be exercised on its
//! own:
//!
//! 1. [`find_badge_regions`] locates the bodies of every
//!    `<!-- badge-compile -->` ... `<!-- badge-compile-stop -->` block.
//! 2. [`extract_image_urls`] pulls the URL out of every `![alt](url)` image
//!    link inside one region body.
//!
//! [`filter_badge_urls`] then deduplicates the raw URLs and drops anything that
//! is not an absolute http(s) URL.
//!
//! # Example
//!
//! ```
//! use badge_compile_core::parser::scan_for_badges;
//!
//! let doc = "<!-- badge-compile -->\n![build](https://img.shields.io/badge/ci-ok-green)\n<!-- badge-compile-stop -->";
//! assert_eq!(scan_for_badges(doc), vec!["https://img.shields.io/badge/ci-ok-green"]);
//! ```

mod error;
mod link;
mod region;
mod url;

pub use error::ParseError;
pub(crate) use link::IMAGE_LINK_PATTERN;
pub use link::extract_image_urls;
pub use region::find_badge_regions;
pub use url::{filter_badge_urls, validate_badge_url};

use tracing::debug;

/// Scans a markdown document for badge regions and returns every image URL
/// found inside them.
///
/// URLs are returned in document order: all links of the first region, then
/// the second, and so on. Duplicates are preserved; see
/// [`filter_badge_urls`] for deduplication.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
#[must_use]
pub fn scan_for_badges(input: &str) -> Vec<String> {
    let regions = find_badge_regions(input);
    debug!(regions = regions.len(), "found badge regions");

    regions
        .into_iter()
        .flat_map(extract_image_urls)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}
