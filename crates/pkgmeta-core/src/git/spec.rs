//! Git locator specification types.

use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{Result, parse_url};
use crate::source::normalize;

/// A git repository locator split into repository URL and optional reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSpec {
    /// Normalized repository URL (e.g., "https://github.com/org/repo.git")
    pub repo_url: String,
    /// Revision pinned by a `#ref` fragment (tag, branch, or commit SHA)
    pub reference: Option<String>,
}

impl GitSpec {
    /// Create a new GitSpec with just a repo URL.
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            reference: None,
        }
    }

    /// Whether a package reference names a git repository rather than a
    /// registry package.
    ///
    /// Scoped registry names (`@scope/name`) also contain a slash, so the
    /// leading `@` rules them out.
    pub fn is_locator(reference: &str) -> bool {
        !reference.starts_with('@') && reference.contains('/')
    }

    /// Parse a git locator into a GitSpec.
    ///
    /// Supports formats:
    /// - `org/repo`
    /// - `github:org/repo`
    /// - `git+https://github.com/org/repo.git`
    /// - `git@github.com:org/repo.git#v1.0.0`
    /// - any form accepted by [`normalize`]
    pub fn parse(locator: &str) -> Self {
        let raw = locator.trim();
        let raw = raw.strip_prefix("git+").unwrap_or(raw);
        let raw = raw.strip_prefix("github:").unwrap_or(raw);

        let (raw, reference) = match raw.split_once('#') {
            Some((url, fragment)) if !fragment.is_empty() => (url, Some(fragment.to_string())),
            Some((url, _)) => (url, None),
            None => (raw, None),
        };

        Self {
            repo_url: normalize(raw),
            reference,
        }
    }

    /// The repository URL as a parsed URL.
    pub fn canonical_url(&self) -> Result<Url> {
        parse_url(&self.repo_url)
    }

    /// Repository name: last path segment without `.git`.
    pub fn repo_name(&self) -> Option<String> {
        let last = self
            .repo_url
            .trim_end_matches('/')
            .rsplit(['/', ':'])
            .next()?;
        let name = last.strip_suffix(".git").unwrap_or(last);
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Bare mirror directory for this repository.
    pub fn bare_repo_dir(&self, state_dir: &Path) -> PathBuf {
        let hash = blake3::hash(self.repo_url.as_bytes()).to_hex().to_string();
        state_dir.join("git").join(format!("{}.git", hash))
    }
}
