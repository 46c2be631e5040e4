//! Badge URL validation and deduplication.

use std::collections::HashSet;

use tracing::{debug, trace};
use url::Url;

use super::error::ParseError;
use crate::report::Reporter;

/// Deduplicates and validates scanned badge URLs.
///
/// The first occurrence of each URL wins and relative order is kept. Entries
/// that are not absolute http(s) URLs are dropped with a warning through
/// `reporter`; this function never fails.
///
/// # Examples
///
/// ```
/// use badge_compile_core::parser::filter_badge_urls;
/// use badge_compile_core::report::RecordingReporter;
///
/// let reporter = RecordingReporter::new();
/// let urls = ["https://x", "foo", "http://y", "ftp://z", "https://x"];
/// assert_eq!(filter_badge_urls(urls, &reporter), vec!["https://x", "http://y"]);
/// assert_eq!(reporter.warnings().len(), 2);
/// ```
#[tracing::instrument(skip_all)]
pub fn filter_badge_urls<I, S>(urls: I, reporter: &dyn Reporter) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut valid = Vec::new();

    for url in urls {
        let url = url.as_ref();
        if !seen.insert(url.to_string()) {
            trace!(url, "duplicate badge URL");
            continue;
        }

        match validate_badge_url(url) {
            Ok(_) => valid.push(url.to_string()),
            Err(e) => {
                debug!(url, error = %e, "badge URL rejected");
                reporter.warn(&format!("Ignoring {e}"));
            }
        }
    }

    valid
}

/// Parses `raw` as an absolute URL and checks that it uses http or https.
///
/// # Errors
///
/// Returns [`ParseError::InvalidUrl`] if `raw` is not an absolute URL and
/// [`ParseError::UnsupportedScheme`] for any scheme other than http(s).
pub fn validate_badge_url(raw: &str) -> Result<Url, ParseError> {
    let parsed = Url::parse(raw).map_err(|e| ParseError::malformed(raw, &e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(ParseError::unsupported_scheme(raw, scheme)),
    }
}
