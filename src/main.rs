//! CLI entry point for badge-compile.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use badge_compile_core::{
    BadgePipeline, GithubReporter, HttpClient, PipelineError, Reporter, RunSummary,
    TracingReporter,
};
use clap::Parser;
use tracing::{debug, info};

mod cli;

use cli::{Args, LogFormat};

/// Process exit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessExit {
    Success,
    Failure,
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        match exit {
            ProcessExit::Success => ExitCode::SUCCESS,
            ProcessExit::Failure => ExitCode::FAILURE,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    init_tracing(args.default_log_level(), no_color_env_requested());
    debug!(?args, "CLI arguments parsed");

    let reporter: Box<dyn Reporter> = match args.log_format.resolve(in_github_actions()) {
        LogFormat::Github => Box::new(GithubReporter),
        LogFormat::Auto | LogFormat::Text => Box::new(TracingReporter),
    };

    match run(&args, reporter.as_ref()).await {
        Ok(()) => ProcessExit::Success.into(),
        Err(err) => {
            reporter.error(&format!("A fatal error occurred: {err:#}"));
            ProcessExit::Failure.into()
        }
    }
}

async fn run(args: &Args, reporter: &dyn Reporter) -> Result<()> {
    let config = args
        .pipeline_config()
        .map_err(PipelineError::config)
        .context("configuration rejected")?;

    let client = HttpClient::with_timeouts(args.connect_timeout, args.read_timeout)
        .context("failed to build HTTP client")?;

    info!(input = %config.input_file.display(), "badge-compile starting");
    let summary = BadgePipeline::new(&client, reporter).run(&config).await?;

    if let Some(path) = &args.summary_json {
        write_summary(path, &summary).await?;
    }
    Ok(())
}

async fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("failed to serialize run summary")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("failed to write run summary {}", path.display()))?;
    debug!(path = %path.display(), "run summary written");
    Ok(())
}

fn init_tracing(default_level: &str, no_color: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_env_filter(filter)
        .try_init();
}

fn no_color_env_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}

fn in_github_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|value| value.eq_ignore_ascii_case("true"))
}
