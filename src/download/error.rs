//! Error types for the download module.
//!
//! This module defines structured errors for badge fetches. None of them are
//! fatal to a run: the pipeline logs the error and leaves the badge link as it
//! was.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching a badge to disk.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("fetching badge {url} failed with error {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("fetching badge {url} timed out")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-success HTTP response.
    #[error("fetching badge {url} failed with status code {status}: {reason}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status, empty when unknown.
        reason: &'static str,
    },

    /// Successful response without a usable Content-Type header.
    #[error("received no content-type header from badge {url}")]
    MissingContentType {
        /// The URL whose response lacked a content type.
        url: String,
    },

    /// File system error while writing the artifact.
    #[error("IO error writing badge to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid badge URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("");
        Self::HttpStatus {
            url: url.into(),
            status,
            reason,
        }
    }

    /// Creates a missing content type error.
    pub fn missing_content_type(url: impl Into<String>) -> Self {
        Self::MissingContentType { url: url.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

// Like the variants above, no From<reqwest::Error> / From<std::io::Error>:
// every variant needs the url or path the source error does not carry.
