//! Error types for badge URL validation.

use thiserror::Error;

/// Reasons a scanned badge URL is rejected.
///
/// These are never fatal: the filter logs them and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// URL could not be parsed as an absolute URL
    #[error("invalid badge URL {url}: {reason}")]
    InvalidUrl {
        /// The URL that failed validation
        url: String,
        /// Why the URL is invalid
        reason: String,
    },

    /// URL parsed, but its scheme is not http or https
    #[error("non-web badge URL {url}: scheme '{scheme}' is not supported")]
    UnsupportedScheme {
        /// The rejected URL
        url: String,
        /// The scheme it used
        scheme: String,
    },
}

impl ParseError {
    /// Creates an `UnsupportedScheme` error for a non-web URL scheme.
    #[must_use]
    pub fn unsupported_scheme(url: &str, scheme: &str) -> Self {
        Self::UnsupportedScheme {
            url: url.to_string(),
            scheme: scheme.to_string(),
        }
    }

    /// Creates an `InvalidUrl` error for a malformed URL.
    #[must_use]
    pub fn malformed(url: &str, parse_error: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: parse_error.to_string(),
        }
    }

    /// Returns the rejected URL.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidUrl { url, .. } | Self::UnsupportedScheme { url, .. } => url,
        }
    }
}
