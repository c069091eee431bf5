//! Version listing across sources.

use url::Url;

use crate::error::Result;
use crate::source::SourceRouter;

/// Lists the versions available for a package reference.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    router: SourceRouter,
}

impl VersionResolver {
    pub fn new(router: SourceRouter) -> Self {
        Self { router }
    }

    /// Versions of `reference`, newest first.
    pub async fn versions(&self, reference: &str) -> Result<Vec<String>> {
        self.router.source_for(reference).versions(reference).await
    }

    /// Commit ids on a branch of a git repository, newest first.
    pub async fn versions_on_branch(&self, url: &Url, branch: &str) -> Result<Vec<String>> {
        tracing::debug!("Listing commits of {} on {}", url, branch);
        self.router.git().list_versions_on_branch(url, branch).await
    }
}
