//! Package sources.
//!
//! A package reference is served by exactly one source: the registry for
//! package names, or git for repository locators. Both expose the same
//! capability set through [`PackageSource`], and [`SourceRouter`] decides
//! which one handles a reference.

mod git_source;
mod router;
mod uri;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::archive::PackageArchive;
use crate::error::Result;

pub use git_source::GitSource;
pub use router::SourceRouter;
pub use uri::normalize;

/// Which route a package reference takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Registry,
    Git,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registry => write!(f, "registry"),
            Self::Git => write!(f, "git"),
        }
    }
}

/// A raw descriptor together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedDescriptor {
    pub raw: Value,
    /// Canonical repository URL when the descriptor was read from a git
    /// repository; it replaces the descriptor's own `repository` field,
    /// which may still point at the upstream of a fork.
    pub fork_source: Option<Url>,
}

impl FetchedDescriptor {
    pub fn new(raw: Value) -> Self {
        Self {
            raw,
            fork_source: None,
        }
    }

    pub fn with_fork_source(mut self, fork_source: Url) -> Self {
        self.fork_source = Some(fork_source);
        self
    }
}

/// What every package source can do.
#[async_trait]
pub trait PackageSource: std::fmt::Debug + Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Available versions, newest first.
    async fn versions(&self, reference: &str) -> Result<Vec<String>>;

    /// The raw descriptor for `version`, or for the source's notion of the
    /// latest version when none is requested.
    async fn descriptor(&self, reference: &str, version: Option<&str>)
    -> Result<FetchedDescriptor>;

    /// The distribution archive for `version`, decompressed.
    async fn archive(&self, reference: &str, version: &str) -> Result<PackageArchive>;
}
