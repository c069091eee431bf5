//! Git repository access.
//!
//! [`GitRepositories`] is the interface the resolver needs from git:
//! locator detection, tag listing, reading a file at a revision and
//! exporting a revision as an archive. [`GitFetcher`] implements it with
//! bare mirrors driven by the `git` binary and libgit2.

mod fetcher;
mod spec;

use async_trait::async_trait;
use url::Url;

use crate::error::Result;

pub use fetcher::GitFetcher;
pub use spec::GitSpec;

/// Git operations used by package sources.
#[async_trait]
pub trait GitRepositories: std::fmt::Debug + Send + Sync {
    /// Whether a package reference is a git locator.
    fn is_git_locator(&self, reference: &str) -> bool;

    /// Canonical repository URL for a locator.
    async fn canonical_url(&self, locator: &str) -> Result<Url>;

    /// Tag names of the repository (unsorted).
    async fn list_versions(&self, locator: &str) -> Result<Vec<String>>;

    /// Commit ids on a branch, newest first.
    async fn list_versions_on_branch(&self, url: &Url, branch: &str) -> Result<Vec<String>>;

    /// Contents of `path` at `version`.
    async fn read_file(&self, locator: &str, version: &str, path: &str) -> Result<String>;

    /// Gzip-compressed tar of `version`, leaving out directories named in
    /// `exclude` at any depth.
    async fn export_archive(
        &self,
        locator: &str,
        version: &str,
        exclude: &[String],
    ) -> Result<Vec<u8>>;
}
