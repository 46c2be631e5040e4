//! CLI argument definitions using clap derive macros.
//!
//! Every input can also come from the environment using the GitHub Actions
//! `INPUT_<NAME>` convention, so the binary runs unchanged as an action step.

use std::path::PathBuf;

use badge_compile_core::{CdnDomain, ConfigError, PipelineConfig, PublishTarget};
use badge_compile_core::download::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use clap::{Parser, ValueEnum};

/// Download the badges in a markdown file and link them from your repository.
///
/// Image links between `<!-- badge-compile -->` and
/// `<!-- badge-compile-stop -->` are fetched, stored in the output image
/// directory, and rewritten to CDN URLs for the current repository and branch.
#[derive(Parser, Debug)]
#[command(name = "badge-compile")]
#[command(author, version, about)]
pub struct Args {
    /// Markdown file to read badges from
    #[arg(long, env = "INPUT_INPUT_MARKDOWN_FILE")]
    pub input_markdown_file: Option<String>,

    /// Where to write the rewritten markdown
    #[arg(long, env = "INPUT_OUTPUT_MARKDOWN_FILE")]
    pub output_markdown_file: Option<String>,

    /// Directory that receives downloaded badges
    #[arg(long, env = "INPUT_OUTPUT_IMAGE_DIR")]
    pub output_image_dir: Option<String>,

    /// Repository identity, as `owner/name`
    #[arg(long, env = "INPUT_CURRENT_REPOSITORY")]
    pub current_repository: Option<String>,

    /// Branch or git ref (`refs/heads/main`); the last segment is used
    #[arg(long, env = "INPUT_CURRENT_BRANCH")]
    pub current_branch: Option<String>,

    /// Use the cached rawcdn.githack.com host (`true`) instead of raw.githack.com
    #[arg(long, env = "INPUT_CDN", default_value = "false")]
    pub cdn: String,

    /// HTTP connect timeout in seconds
    #[arg(long, default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: u64,

    /// HTTP read timeout in seconds
    #[arg(long, default_value_t = READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// How user-facing messages are printed
    #[arg(long, value_enum, default_value_t = LogFormat::Auto)]
    pub log_format: LogFormat,

    /// Write a JSON summary of the run to this file
    #[arg(long, value_name = "PATH")]
    pub summary_json: Option<PathBuf>,
}

/// Output style for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// `github` inside GitHub Actions, `text` elsewhere
    Auto,
    /// Plain log lines on stderr
    Text,
    /// GitHub workflow commands on stdout
    Github,
}

impl LogFormat {
    /// Resolves `Auto` against whether the process runs inside GitHub Actions.
    pub fn resolve(self, in_github_actions: bool) -> Self {
        match self {
            Self::Auto if in_github_actions => Self::Github,
            Self::Auto => Self::Text,
            other => other,
        }
    }
}

impl Args {
    /// Validates the inputs into a pipeline configuration.
    ///
    /// Blank values count as missing. Nothing is read or written here.
    pub fn pipeline_config(&self) -> Result<PipelineConfig, ConfigError> {
        let input = required(self.input_markdown_file.as_deref(), "input_markdown_file")?;
        let output = required(self.output_markdown_file.as_deref(), "output_markdown_file")?;
        let image_dir = required(self.output_image_dir.as_deref(), "output_image_dir")?;
        let repository = required(self.current_repository.as_deref(), "current_repository")?;
        let branch = required(self.current_branch.as_deref(), "current_branch")?;

        let target = PublishTarget::new(repository, branch, CdnDomain::from_flag(&self.cdn))?;
        Ok(
            PipelineConfig::new(PathBuf::from(input), PathBuf::from(output), PathBuf::from(image_dir))
                .with_publish_target(target),
        )
    }

    /// Default tracing level when `RUST_LOG` is not set.
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, ConfigError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingInput { name }),
    }
}
