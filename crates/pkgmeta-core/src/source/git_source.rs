//! Packages served straight from git repositories.

use async_trait::async_trait;
use std::sync::Arc;

use super::{FetchedDescriptor, PackageSource, SourceKind};
use crate::archive::PackageArchive;
use crate::error::{ResolveError, Result};
use crate::git::{GitRepositories, GitSpec};
use crate::version::ordering::sort_newest_first;

/// Tags are versions; the descriptor file is read at the tag.
#[derive(Debug, Clone)]
pub struct GitSource {
    git: Arc<dyn GitRepositories>,
    descriptor_file: String,
    archive_excludes: Vec<String>,
}

impl GitSource {
    pub fn new(
        git: Arc<dyn GitRepositories>,
        descriptor_file: String,
        archive_excludes: Vec<String>,
    ) -> Self {
        Self {
            git,
            descriptor_file,
            archive_excludes,
        }
    }
}

#[async_trait]
impl PackageSource for GitSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Git
    }

    async fn versions(&self, reference: &str) -> Result<Vec<String>> {
        let url = self.git.canonical_url(reference).await?;
        let mut versions = self.git.list_versions(url.as_str()).await?;
        sort_newest_first(&mut versions);
        Ok(versions)
    }

    async fn descriptor(
        &self,
        reference: &str,
        version: Option<&str>,
    ) -> Result<FetchedDescriptor> {
        // A `#ref` fragment pins the revision when no version is requested.
        let pinned = GitSpec::parse(reference).reference;
        let version = match version.map(str::to_string).or(pinned) {
            Some(version) => version,
            None => self
                .versions(reference)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    ResolveError::version_not_resolvable(reference, "repository has no tags")
                })?,
        };

        let content = self
            .git
            .read_file(reference, &version, &self.descriptor_file)
            .await?;
        let raw = serde_json::from_str(&content)?;
        let fork_source = self.git.canonical_url(reference).await?;

        Ok(FetchedDescriptor::new(raw).with_fork_source(fork_source))
    }

    async fn archive(&self, reference: &str, version: &str) -> Result<PackageArchive> {
        let compressed = self
            .git
            .export_archive(reference, version, &self.archive_excludes)
            .await?;
        let url = self.git.canonical_url(reference).await?;
        let repo = GitSpec::new(url.as_str())
            .repo_name()
            .unwrap_or_else(|| "package".to_string());

        PackageArchive::from_gzip(format!("{}-{}.tgz", repo, version), &compressed)
    }
}
