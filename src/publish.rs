//! Publishable URL resolution for stored badges.
//!
//! A stored badge is referenced from the rewritten document through a CDN URL
//! built from the repository, the branch, and the artifact's path inside the
//! repository:
//!
//! ```text
//! https://<cdn-host>/<owner>/<repo>/<branch>/<artifact path>
//! ```

use std::fmt;
use std::path::{Component, Path};

use thiserror::Error;
use tracing::warn;
use url::Url;

/// Configuration problems detected before any work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required input was not supplied (or was blank).
    #[error("input required and not supplied: {name}")]
    MissingInput {
        /// Name of the missing input.
        name: &'static str,
    },

    /// The branch reference has no usable final segment.
    #[error("could not parse supplied ref \"{reference}\"")]
    InvalidBranchRef {
        /// The reference as supplied.
        reference: String,
    },

    /// Repository and branch do not form a valid base URL.
    #[error("invalid repository \"{repository}\": {reason}")]
    InvalidRepository {
        /// The repository as supplied.
        repository: String,
        /// Why the base URL could not be built.
        reason: String,
    },
}

/// CDN host used for published badge URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CdnDomain {
    /// `raw.githack.com`, which follows the branch head.
    #[default]
    Raw,
    /// `rawcdn.githack.com`, the permanently cached variant.
    RawCdn,
}

impl CdnDomain {
    /// Interprets a boolean-like flag: `true` (any case) selects the cached
    /// CDN, anything else the raw host.
    #[must_use]
    pub fn from_flag(flag: &str) -> Self {
        if flag.trim().eq_ignore_ascii_case("true") {
            Self::RawCdn
        } else {
            Self::Raw
        }
    }

    /// Host name of this CDN.
    #[must_use]
    pub fn host(self) -> &'static str {
        match self {
            Self::Raw => "raw.githack.com",
            Self::RawCdn => "rawcdn.githack.com",
        }
    }
}

impl fmt::Display for CdnDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host())
    }
}

/// Returns the branch name from a git ref: its final `/`-separated segment.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBranchRef`] if that segment is empty.
///
/// # Examples
///
/// ```
/// use badge_compile_core::publish::parse_branch;
///
/// assert_eq!(parse_branch("refs/heads/main").unwrap(), "main");
/// assert_eq!(parse_branch("develop").unwrap(), "develop");
/// assert!(parse_branch("refs/heads/").is_err());
/// ```
pub fn parse_branch(reference: &str) -> Result<&str, ConfigError> {
    match reference.rsplit('/').next() {
        Some(branch) if !branch.is_empty() => Ok(branch),
        _ => Err(ConfigError::InvalidBranchRef {
            reference: reference.to_string(),
        }),
    }
}

/// Base URL that stored badge paths are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    base: Url,
}

impl PublishTarget {
    /// Builds `https://<cdn>/<repository>/<branch>/` from a repository
    /// identity (`owner/name`) and a git ref.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the repository is blank, the ref has no
    /// branch segment, or the pieces do not form a valid URL.
    pub fn new(repository: &str, reference: &str, cdn: CdnDomain) -> Result<Self, ConfigError> {
        let repository = repository.trim().trim_matches('/');
        if repository.is_empty() {
            return Err(ConfigError::MissingInput {
                name: "current_repository",
            });
        }
        let branch = parse_branch(reference)?;
        let raw = format!("https://{}/{repository}/{branch}/", cdn.host());
        let base = Url::parse(&raw).map_err(|e| ConfigError::InvalidRepository {
            repository: repository.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { base })
    }

    /// The base URL, ending in `/`.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves an artifact path against the base URL.
    ///
    /// A relative path lands under the branch; an absolute path replaces the
    /// whole base path, following URL reference resolution.
    #[must_use]
    pub fn resolve(&self, artifact: &Path) -> String {
        let reference = path_to_url_reference(artifact);
        match self.base.join(&reference) {
            Ok(url) => url.into(),
            Err(e) => {
                warn!(path = %artifact.display(), error = %e, "could not resolve artifact URL; using path");
                reference
            }
        }
    }
}

/// Renders a filesystem path as a `/`-separated URL reference.
pub(crate) fn path_to_url_reference(path: &Path) -> String {
    let mut absolute = false;
    let mut segments: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::RootDir | Component::Prefix(_) => absolute = true,
            Component::CurDir => {}
            Component::ParentDir => segments.push("..".to_string()),
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
        }
    }
    let joined = segments.join("/");
    if absolute { format!("/{joined}") } else { joined }
}
