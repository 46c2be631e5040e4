//! HTTP client wrapper for fetching badges.
//!
//! This module provides the `HttpClient` struct which fetches a badge,
//! checks the response, and streams the body to a file named after the
//! response's content type.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::filename::{extension_from_content_type, path_with_extension};
use crate::report::Reporter;
use crate::user_agent::BROWSER_USER_AGENT;

/// Result of fetching one badge.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The badge was written to this path.
    Stored(PathBuf),
    /// The fetch failed; nothing was left on disk.
    Failed(DownloadError),
}

impl FetchOutcome {
    /// Returns the stored path, if the fetch succeeded.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Stored(path) => Some(path),
            Self::Failed(_) => None,
        }
    }

    /// Returns `true` if the badge was stored.
    #[must_use]
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored(_))
    }
}

impl From<Result<PathBuf, DownloadError>> for FetchOutcome {
    fn from(result: Result<PathBuf, DownloadError>) -> Self {
        match result {
            Ok(path) => Self::Stored(path),
            Err(e) => Self::Failed(e),
        }
    }
}

/// HTTP client for fetching badges.
///
/// This client is designed to be created once and shared by every fetch in a
/// run, taking advantage of connection pooling. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes
    /// - Gzip decompression: enabled
    /// - Browser-like User-Agent
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the underlying client cannot
    /// be constructed (for example, no TLS backend is available).
    pub fn with_timeouts(
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|source| DownloadError::ClientBuild { source })?;
        Ok(Self { client })
    }

    /// Fetches `url` and stores the body at `stem` plus an extension derived
    /// from the response content type.
    ///
    /// Failures are reported as a warning through `reporter` and returned as
    /// [`FetchOutcome::Failed`]; this method never errors.
    #[instrument(skip(self, stem, reporter), fields(url = %url))]
    pub async fn fetch_and_store(
        &self,
        url: &str,
        stem: &Path,
        reporter: &dyn Reporter,
    ) -> FetchOutcome {
        let result = self.try_fetch_and_store(url, stem).await;
        if let Err(e) = &result {
            reporter.warn(&capitalize(&e.to_string()));
        }
        result.into()
    }

    /// Fetches `url` and stores the body at `stem` plus an extension derived
    /// from the response content type, returning the full path written.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns a non-success status
    /// - The response has no Content-Type header
    /// - Writing to disk fails
    #[must_use = "fetch result contains the path to the stored badge"]
    #[instrument(skip(self, stem), fields(url = %url))]
    pub async fn try_fetch_and_store(
        &self,
        url: &str,
        stem: &Path,
    ) -> Result<PathBuf, DownloadError> {
        debug!("starting badge fetch");

        let parsed_url =
            Url::parse(url).map_err(|_| DownloadError::invalid_url(url.to_string()))?;

        let response = self.client.get(parsed_url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DownloadError::missing_content_type(url))?;
        let extension = extension_from_content_type(content_type);
        let file_path = path_with_extension(stem, extension);
        debug!(content_type, path = %file_path.display(), "resolved artifact path");

        let mut file = File::create(&file_path)
            .await
            .map_err(|e| DownloadError::io(file_path.clone(), e))?;

        // Stream response body to file, with cleanup on error
        let stream_result = stream_to_file(&mut file, response, url, &file_path).await;
        if stream_result.is_err() {
            drop(file);
            debug!(path = %file_path.display(), "cleaning up partial badge after error");
            let _ = tokio::fs::remove_file(&file_path).await;
        }
        let bytes = stream_result?;

        info!(path = %file_path.display(), bytes, "badge stored");
        Ok(file_path)
    }
}

/// Streams response body to file, returning bytes written.
///
/// This is extracted to enable cleanup on error in the caller.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    // Ensure all data is flushed to disk
    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
