//! Resolver context for dependency injection.

use std::sync::Arc;

use crate::archive::ArchiveFetcher;
use crate::config::ResolverConfig;
use crate::error::Result;
use crate::git::{GitFetcher, GitRepositories};
use crate::http::{HttpTransport, ReqwestTransport};
use crate::license::LicenseDetector;
use crate::platform::{GitHub, HostingPlatform};
use crate::resolve::MetadataResolver;
use crate::source::SourceRouter;
use crate::version::VersionResolver;

/// Shared collaborators and the services built on them.
///
/// Frontends create this once and ask it for services; nothing is global.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    config: ResolverConfig,
    transport: Arc<dyn HttpTransport>,
    git: Arc<dyn GitRepositories>,
    platform: Arc<dyn HostingPlatform>,
}

impl ResolveContext {
    /// Build the default collaborators from configuration.
    pub fn new(config: ResolverConfig) -> Result<Self> {
        config.validate()?;
        let transport: Arc<dyn HttpTransport> =
            Arc::new(ReqwestTransport::new(&config.user_agent)?);
        let git = Arc::new(GitFetcher::new(config.state_dir()));
        let platform = Arc::new(GitHub::new(
            Arc::clone(&transport),
            config.github_api_url.clone(),
        ));
        Ok(Self::with_collaborators(config, transport, git, platform))
    }

    /// Use the given collaborators instead of the defaults.
    pub fn with_collaborators(
        config: ResolverConfig,
        transport: Arc<dyn HttpTransport>,
        git: Arc<dyn GitRepositories>,
        platform: Arc<dyn HostingPlatform>,
    ) -> Self {
        Self {
            config,
            transport,
            git,
            platform,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn source_router(&self) -> SourceRouter {
        SourceRouter::new(
            &self.config,
            Arc::clone(&self.transport),
            Arc::clone(&self.git),
        )
    }

    pub fn version_resolver(&self) -> VersionResolver {
        VersionResolver::new(self.source_router())
    }

    pub fn metadata_resolver(&self) -> MetadataResolver {
        MetadataResolver::new(self.source_router(), Arc::clone(&self.platform))
    }

    pub fn archive_fetcher(&self) -> ArchiveFetcher {
        ArchiveFetcher::new(self.source_router())
    }

    pub fn license_detector(&self) -> LicenseDetector {
        LicenseDetector::new(
            Arc::clone(&self.transport),
            self.config.license_host_url.clone(),
            self.config.license_classifier_url.clone(),
        )
    }
}
