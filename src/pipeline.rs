//! End-to-end badge compilation.
//!
//! A run moves through fixed stages:
//!
//! ```text
//! Load -> Scan -> Filter -> FetchAll -> Map -> Rewrite -> Persist -> Done
//! ```
//!
//! Any stage may fail into a [`PipelineError`], which records where it
//! happened. Finding no usable badges ends the run early at `Filter` and is not
//! an error. Individual fetch failures are reported and skipped; they never
//! fail the run.
//!
//! # Example
//!
//! ```no_run
//! use badge_compile_core::pipeline::{BadgePipeline, PipelineConfig};
//! use badge_compile_core::download::HttpClient;
//! use badge_compile_core::report::TracingReporter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::new("README.src.md", "README.md", "badges");
//! let client = HttpClient::new();
//! let summary = BadgePipeline::new(&client, &TracingReporter).run(&config).await?;
//! println!("stored {} of {} badges", summary.fetched, summary.valid);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use futures_util::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::download::{FetchOutcome, HttpClient, artifact_stem};
use crate::parser::{filter_badge_urls, scan_for_badges};
use crate::publish::{ConfigError, PublishTarget, path_to_url_reference};
use crate::report::Reporter;
use crate::rewrite::{BadgeMapping, replace_badge_urls};

/// Stage of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Reading the input document.
    Load,
    /// Extracting badge URLs from regions.
    Scan,
    /// Deduplicating and validating URLs.
    Filter,
    /// Fetching every badge concurrently.
    FetchAll,
    /// Pairing successful fetches with their URLs.
    Map,
    /// Rewriting image links.
    Rewrite,
    /// Writing the output document.
    Persist,
    /// Finished.
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Load => "load",
            Self::Scan => "scan",
            Self::Filter => "filter",
            Self::FetchAll => "fetch_all",
            Self::Map => "map",
            Self::Rewrite => "rewrite",
            Self::Persist => "persist",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Fatal pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Inputs did not form a usable configuration.
    #[error("invalid configuration: {source}")]
    Config {
        /// What was wrong.
        #[source]
        source: ConfigError,
    },

    /// The input document could not be read.
    #[error("failed to read input markdown {path}: {source}")]
    ReadInput {
        /// Input path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The artifact directory could not be created.
    #[error("failed to create output image directory {path}: {source}")]
    CreateOutputDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The rewritten document could not be written.
    #[error("failed to write output markdown {path}: {source}")]
    WriteOutput {
        /// Output path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Wraps a configuration problem.
    #[must_use]
    pub fn config(source: ConfigError) -> Self {
        Self::Config { source }
    }

    /// The stage the run was in when it failed.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Config { .. } | Self::ReadInput { .. } => Stage::Load,
            Self::CreateOutputDir { .. } => Stage::FetchAll,
            Self::WriteOutput { .. } => Stage::Persist,
        }
    }
}

/// Inputs for one run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Markdown document to read.
    pub input_file: PathBuf,
    /// Where to write the rewritten document.
    pub output_file: PathBuf,
    /// Directory that receives `badge-<n>.<ext>` artifacts.
    pub output_dir: PathBuf,
    /// Base URL for rewritten links. `None` links the artifact path directly.
    pub publish: Option<PublishTarget>,
}

impl PipelineConfig {
    /// Creates a config that links artifacts by their local path.
    pub fn new(
        input_file: impl Into<PathBuf>,
        output_file: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_file: input_file.into(),
            output_file: output_file.into(),
            output_dir: output_dir.into(),
            publish: None,
        }
    }

    /// Links artifacts through `target` instead of their local path.
    #[must_use]
    pub fn with_publish_target(mut self, target: PublishTarget) -> Self {
        self.publish = Some(target);
        self
    }

    fn link_for(&self, artifact: &Path) -> String {
        match &self.publish {
            Some(target) => target.resolve(artifact),
            None => path_to_url_reference(artifact),
        }
    }
}

/// What a completed run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Image links found inside badge regions, duplicates included.
    pub found: usize,
    /// Unique, valid http(s) badge URLs.
    pub valid: usize,
    /// Badges stored on disk.
    pub fetched: usize,
    /// Badges whose fetch failed.
    pub failed: usize,
    /// URL replacements applied to the document.
    pub replacements: Vec<BadgeMapping>,
    /// Whether the output document was written.
    pub output_written: bool,
}

/// Runs the badge compilation stages against one document.
///
/// Holds no state between runs; the client and reporter are borrowed.
#[derive(Clone, Copy)]
pub struct BadgePipeline<'a> {
    client: &'a HttpClient,
    reporter: &'a dyn Reporter,
}

impl fmt::Debug for BadgePipeline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BadgePipeline")
            .field("client", self.client)
            .finish_non_exhaustive()
    }
}

impl<'a> BadgePipeline<'a> {
    /// Creates a pipeline using `client` for fetches and `reporter` for
    /// user-facing messages.
    #[must_use]
    pub fn new(client: &'a HttpClient, reporter: &'a dyn Reporter) -> Self {
        Self { client, reporter }
    }

    /// Executes one run.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the input cannot be read, the artifact
    /// directory cannot be created, or the output cannot be written. Badge
    /// validation and fetch failures are reported, not returned.
    #[instrument(skip(self, config), fields(input = %config.input_file.display()))]
    pub async fn run(&self, config: &PipelineConfig) -> Result<RunSummary, PipelineError> {
        let mut summary = RunSummary::default();

        enter(Stage::Load);
        let raw = tokio::fs::read(&config.input_file)
            .await
            .map_err(|source| PipelineError::ReadInput {
                path: config.input_file.clone(),
                source,
            })?;
        // Invalid UTF-8 is replaced with U+FFFD rather than failing the run.
        let input = String::from_utf8_lossy(&raw).into_owned();

        enter(Stage::Scan);
        let badges = scan_for_badges(&input);
        summary.found = badges.len();

        enter(Stage::Filter);
        let valid = filter_badge_urls(&badges, self.reporter);
        summary.valid = valid.len();
        if valid.is_empty() {
            self.reporter.warn("Didn't find any badges to replace!");
            enter(Stage::Done);
            return Ok(summary);
        }
        self.reporter.info("Found badge URLs to replace:");
        for url in &valid {
            self.reporter.info(&format!("\t- {url}"));
        }

        enter(Stage::FetchAll);
        tokio::fs::create_dir_all(&config.output_dir)
            .await
            .map_err(|source| PipelineError::CreateOutputDir {
                path: config.output_dir.clone(),
                source,
            })?;
        let outcomes = self.fetch_all(&valid, &config.output_dir).await;

        enter(Stage::Map);
        let replacements: Vec<BadgeMapping> = valid
            .iter()
            .zip(&outcomes)
            .filter_map(|(url, outcome)| {
                outcome
                    .path()
                    .map(|path| BadgeMapping::new(url.as_str(), config.link_for(path)))
            })
            .collect();
        summary.fetched = replacements.len();
        summary.failed = outcomes.len() - replacements.len();

        enter(Stage::Rewrite);
        let output = replace_badge_urls(&input, &replacements);

        enter(Stage::Persist);
        tokio::fs::write(&config.output_file, output)
            .await
            .map_err(|source| PipelineError::WriteOutput {
                path: config.output_file.clone(),
                source,
            })?;
        summary.output_written = true;
        summary.replacements = replacements;

        enter(Stage::Done);
        info!(
            found = summary.found,
            valid = summary.valid,
            fetched = summary.fetched,
            failed = summary.failed,
            output = %config.output_file.display(),
            "badge compilation complete"
        );
        Ok(summary)
    }

    /// Fetches every URL at once and waits for all of them to settle.
    ///
    /// The returned outcomes are index-aligned with `urls`.
    async fn fetch_all(&self, urls: &[String], output_dir: &Path) -> Vec<FetchOutcome> {
        let fetches = urls.iter().enumerate().map(|(index, url)| {
            let stem = artifact_stem(output_dir, index);
            async move {
                self.client
                    .fetch_and_store(url, &stem, self.reporter)
                    .await
            }
        });
        join_all(fetches).await
    }
}

fn enter(stage: Stage) {
    debug!(%stage, "entering stage");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::publish::CdnDomain;
    use crate::report::RecordingReporter;
    use crate::test_support::raw_server::{NO_CONTENT_TYPE_RESPONSE, serve_raw_response};
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    const SVG: &[u8] = b"<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>";

    fn region(links: &str) -> String {
        format!("# Project\n<!-- badge-compile -->\n{links}\n<!-- badge-compile-stop -->\n")
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::FetchAll.to_string(), "fetch_all");
        assert_eq!(Stage::Done.to_string(), "done");
    }

    #[test]
    fn test_pipeline_error_stage() {
        let io = || std::io::Error::other("boom");
        assert_eq!(
            PipelineError::ReadInput {
                path: "a".into(),
                source: io()
            }
            .stage(),
            Stage::Load
        );
        assert_eq!(
            PipelineError::WriteOutput {
                path: "a".into(),
                source: io()
            }
            .stage(),
            Stage::Persist
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = PipelineError::config(ConfigError::MissingInput {
            name: "output_image_dir",
        });
        assert_eq!(err.stage(), Stage::Load);
        assert_eq!(
            err.to_string(),
            "invalid configuration: input required and not supplied: output_image_dir"
        );
    }

    #[test]
    fn test_link_for_without_publish_target_uses_path() {
        let config = PipelineConfig::new("in.md", "out.md", "badges");
        assert_eq!(
            config.link_for(Path::new("badges/badge-0.svg")),
            "badges/badge-0.svg"
        );
    }

    #[test]
    fn test_link_for_with_publish_target() {
        let target = PublishTarget::new("o/r", "refs/heads/main", CdnDomain::Raw).unwrap();
        let config = PipelineConfig::new("in.md", "out.md", "badges").with_publish_target(target);
        assert_eq!(
            config.link_for(Path::new("badges/badge-0.svg")),
            "https://raw.githack.com/o/r/main/badges/badge-0.svg"
        );
    }

    #[tokio::test]
    async fn test_run_missing_input_is_load_error() {
        let temp = TempDir::new().unwrap();
        let config = PipelineConfig::new(
            temp.path().join("missing.md"),
            temp.path().join("out.md"),
            temp.path().join("badges"),
        );
        let client = HttpClient::new();
        let reporter = RecordingReporter::new();

        let err = BadgePipeline::new(&client, &reporter)
            .run(&config)
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Load);
        assert!(!temp.path().join("out.md").exists());
    }

    #[tokio::test]
    async fn test_run_without_badges_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in.md");
        std::fs::write(&input, "# Nothing here\n![a](https://x.svg)\n").unwrap();
        let config = PipelineConfig::new(
            &input,
            temp.path().join("out.md"),
            temp.path().join("badges"),
        );
        let client = HttpClient::new();
        let reporter = RecordingReporter::new();

        let summary = BadgePipeline::new(&client, &reporter)
            .run(&config)
            .await
            .unwrap();

        assert_eq!(summary, RunSummary::default());
        assert!(!temp.path().join("out.md").exists());
        assert!(!temp.path().join("badges").exists());
        assert_eq!(reporter.warnings(), vec!["Didn't find any badges to replace!"]);
    }

    #[tokio::test]
    async fn test_run_only_invalid_badges_is_noop() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in.md");
        std::fs::write(&input, region("![a](ftp://x/badge.svg)\n![b](not a url)")).unwrap();
        let config = PipelineConfig::new(
            &input,
            temp.path().join("out.md"),
            temp.path().join("badges"),
        );
        let client = HttpClient::new();
        let reporter = RecordingReporter::new();

        let summary = BadgePipeline::new(&client, &reporter)
            .run(&config)
            .await
            .unwrap();

        // "not a url" has whitespace, so only "ftp://x/badge.svg" is scanned.
        assert_eq!(summary.found, 1);
        assert_eq!(summary.valid, 0);
        assert!(!summary.output_written);
        assert_eq!(reporter.warnings().len(), 2);
    }

    #[tokio::test]
    async fn test_run_mixed_success_and_failure() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/ok.svg"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(SVG.to_vec(), "image/svg+xml"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken.svg"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let ok = format!("{}/ok.svg", mock_server.uri());
        let broken = format!("{}/broken.svg", mock_server.uri());
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in.md");
        let doc = region(&format!("![broken]({broken})\n![ok]({ok})\n![ok again]({ok})"));
        std::fs::write(&input, &doc).unwrap();
        let badges = temp.path().join("badges");
        let config = PipelineConfig::new(&input, temp.path().join("out.md"), &badges);
        let client = HttpClient::new();
        let reporter = RecordingReporter::new();

        let summary = BadgePipeline::new(&client, &reporter)
            .run(&config)
            .await
            .unwrap();

        assert_eq!(summary.found, 3);
        assert_eq!(summary.valid, 2);
        assert_eq!(summary.fetched, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.output_written);

        // ok is the second valid URL, so it lands at index 1.
        let stored = badges.join("badge-1.svg");
        assert_eq!(std::fs::read(&stored).unwrap(), SVG);
        assert!(!badges.join("badge-0.svg").exists());

        let link = path_to_url_reference(&stored);
        let output = std::fs::read_to_string(temp.path().join("out.md")).unwrap();
        assert_eq!(
            output,
            region(&format!("![broken]({broken})\n![ok]({link})\n![ok again]({link})"))
        );
        assert_eq!(reporter.warnings().len(), 1);
        assert!(reporter.warnings()[0].contains("500"));
    }

    #[tokio::test]
    async fn test_run_missing_content_type_keeps_link() {
        let Some(base) = serve_raw_response(NO_CONTENT_TYPE_RESPONSE).await else {
            return;
        };
        let url = format!("{base}/b");
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in.md");
        let doc = region(&format!("![b]({url})"));
        std::fs::write(&input, &doc).unwrap();
        let badges = temp.path().join("badges");
        let config = PipelineConfig::new(&input, temp.path().join("out.md"), &badges);
        let client = HttpClient::new();
        let reporter = RecordingReporter::new();

        let summary = BadgePipeline::new(&client, &reporter)
            .run(&config)
            .await
            .unwrap();

        assert_eq!(summary.valid, 1);
        assert_eq!(summary.fetched, 0);
        assert_eq!(summary.failed, 1);
        assert!(summary.output_written);
        assert_eq!(
            std::fs::read_to_string(temp.path().join("out.md")).unwrap(),
            doc
        );
        assert_eq!(std::fs::read_dir(&badges).unwrap().count(), 0);
        let warnings = reporter.warnings();
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(
            warnings[0].starts_with("Received no content-type header"),
            "{warnings:?}"
        );
    }

    #[tokio::test]
    async fn test_run_invalid_utf8_input_is_decoded_lossily() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/ok.svg"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(SVG.to_vec(), "image/svg+xml"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/ok.svg", mock_server.uri());
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in.md");
        let mut raw = b"caf\xe9\n".to_vec();
        raw.extend_from_slice(region(&format!("![ok]({url})")).as_bytes());
        std::fs::write(&input, &raw).unwrap();
        let badges = temp.path().join("badges");
        let config = PipelineConfig::new(&input, temp.path().join("out.md"), &badges);
        let client = HttpClient::new();
        let reporter = RecordingReporter::new();

        let summary = BadgePipeline::new(&client, &reporter)
            .run(&config)
            .await
            .unwrap();

        assert_eq!(summary.fetched, 1);
        let link = path_to_url_reference(&badges.join("badge-0.svg"));
        assert_eq!(
            std::fs::read_to_string(temp.path().join("out.md")).unwrap(),
            format!("caf\u{FFFD}\n{}", region(&format!("![ok]({link})")))
        );
    }
}
