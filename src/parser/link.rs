//! Markdown image link extraction.

use std::sync::LazyLock;

use regex::Regex;

/// Matches `![alt](url)`, capturing the alt text (group 1) and the URL with
/// surrounding whitespace stripped (group 2).
#[allow(clippy::expect_used)]
pub(crate) static IMAGE_LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\]]+)\]\(\s*([^\s)]+)\s*\)").expect("image link regex is valid") // Static pattern, safe to panic
});

/// Returns the URL of every markdown image link in `text`, in order.
///
/// Links are recognized even when glued to surrounding text. Plain
/// (non-image) links are skipped.
#[must_use]
pub fn extract_image_urls(text: &str) -> Vec<&str> {
    IMAGE_LINK_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(2))
        .map(|url| url.as_str())
        .collect()
}
