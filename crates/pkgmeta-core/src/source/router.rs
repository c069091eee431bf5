//! Routing between the registry and git sources.

use std::sync::Arc;

use super::{GitSource, PackageSource, SourceKind};
use crate::config::ResolverConfig;
use crate::git::GitRepositories;
use crate::http::HttpTransport;
use crate::registry::RegistrySource;

/// Picks the source responsible for a package reference.
#[derive(Debug, Clone)]
pub struct SourceRouter {
    git: Arc<dyn GitRepositories>,
    registry: Arc<RegistrySource>,
    git_source: Arc<GitSource>,
}

impl SourceRouter {
    pub fn new(
        config: &ResolverConfig,
        transport: Arc<dyn HttpTransport>,
        git: Arc<dyn GitRepositories>,
    ) -> Self {
        let registry = Arc::new(RegistrySource::new(transport, config.registry_url.clone()));
        let git_source = Arc::new(GitSource::new(
            Arc::clone(&git),
            config.descriptor_file.clone(),
            config.archive_excludes.clone(),
        ));
        Self {
            git,
            registry,
            git_source,
        }
    }

    /// The git collaborator behind the git route.
    pub fn git(&self) -> &Arc<dyn GitRepositories> {
        &self.git
    }

    pub fn kind_of(&self, reference: &str) -> SourceKind {
        if self.git.is_git_locator(reference) {
            SourceKind::Git
        } else {
            SourceKind::Registry
        }
    }

    pub fn source_for(&self, reference: &str) -> Arc<dyn PackageSource> {
        let kind = self.kind_of(reference);
        tracing::debug!("Routing '{}' to the {} source", reference, kind);
        match kind {
            SourceKind::Git => self.git_source.clone(),
            SourceKind::Registry => self.registry.clone(),
        }
    }
}
