//! Badge region detection.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

/// Matches a whole `<!-- badge-compile -->` ... `<!-- badge-compile-stop -->`
/// block and captures the body between the markers.
///
/// Each marker must sit on its own line. The body cannot contain `<`, so an
/// HTML tag inside a block stops it from being recognized at all.
#[allow(clippy::expect_used)]
static REGION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)<!--\s*badge-compile\s*-->\s*$\s*([^<]+)\s*^\s*<!--\s*badge-compile-stop\s*-->",
    )
    .expect("badge region regex is valid") // Static pattern, safe to panic
});

/// Returns the body of every badge region in `input`, in document order.
///
/// Regions never overlap and do not nest. A start marker without a matching
/// stop marker is ignored.
#[must_use]
pub fn find_badge_regions(input: &str) -> Vec<&str> {
    REGION_PATTERN
        .captures_iter(input)
        .filter_map(|caps| caps.get(1))
        .map(|body| body.as_str())
        .filter(|body| !body.is_empty())
        .inspect(|body| trace!(len = body.len(), "badge region"))
        .collect()
}
