//! HTTP badge fetcher.
//!
//! This module downloads a single badge image and stores it next to its
//! siblings in the output directory.
//!
//! # Features
//!
//! - Streaming writes (the body is never buffered whole)
//! - File extension derived from the response Content-Type
//! - Browser-like User-Agent, since some badge hosts reject bot clients
//! - Configurable timeouts (30s connect, 5min read by default)
//! - Partial artifacts removed when a fetch fails mid-stream
//!
//! # Example
//!
//! ```no_run
//! use badge_compile_core::download::{FetchOutcome, HttpClient, artifact_stem};
//! use badge_compile_core::report::TracingReporter;
//! use std::path::Path;
//!
//! # async fn example() {
//! let client = HttpClient::new();
//! let stem = artifact_stem(Path::new("./badges"), 0);
//! match client
//!     .fetch_and_store("https://img.shields.io/badge/ci-passing-green", &stem, &TracingReporter)
//!     .await
//! {
//!     FetchOutcome::Stored(path) => println!("stored {}", path.display()),
//!     FetchOutcome::Failed(e) => eprintln!("{e}"),
//! }
//! # }
//! ```

mod client;
mod constants;
mod error;
mod filename;

pub use client::{FetchOutcome, HttpClient};
pub use constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use error::DownloadError;
pub use filename::{artifact_stem, path_with_extension};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
