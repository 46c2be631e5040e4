//! Badge Compile Core Library
//!
//! This library provides the core functionality for the badge-compile tool,
//! which downloads the remote badge images referenced inside marked regions of
//! a markdown document and rewrites the document to point at the stored copies.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - Badge region scanning and badge URL filtering
//! - [`rewrite`] - Markdown image link rewriting
//! - [`download`] - HTTP fetching of a single badge to disk
//! - [`publish`] - Branch parsing and publishable URL resolution
//! - [`report`] - Injected message sink for info/warning/error output
//! - [`pipeline`] - End-to-end orchestration of a single run

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod parser;
pub mod pipeline;
pub mod publish;
pub mod report;
pub mod rewrite;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use download::{DownloadError, FetchOutcome, HttpClient};
pub use parser::{ParseError, filter_badge_urls, scan_for_badges};
pub use pipeline::{BadgePipeline, PipelineConfig, PipelineError, RunSummary, Stage};
pub use publish::{CdnDomain, ConfigError, PublishTarget, parse_branch};
pub use report::{GithubReporter, RecordingReporter, Reporter, TracingReporter};
pub use rewrite::{BadgeMapping, replace_badge_urls};
