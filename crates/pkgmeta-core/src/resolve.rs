//! Metadata resolution pipeline.
//!
//! reference -> source -> raw descriptor -> [`PackageMetadata`] -> platform
//! reconciliation. Every step depends on the one before it, so the steps run
//! strictly in sequence.

use std::sync::Arc;
use url::Url;

use crate::descriptor::{DescriptorReader, PackageMetadata};
use crate::error::Result;
use crate::platform::HostingPlatform;
use crate::source::SourceRouter;

/// Resolves canonical metadata for a package reference.
#[derive(Debug, Clone)]
pub struct MetadataResolver {
    router: SourceRouter,
    platform: Arc<dyn HostingPlatform>,
}

impl MetadataResolver {
    pub fn new(router: SourceRouter, platform: Arc<dyn HostingPlatform>) -> Self {
        Self { router, platform }
    }

    /// Resolve metadata for `reference` at `requested_version` (latest when
    /// absent). `override_source` takes precedence over any repository URL
    /// the descriptor or git locator provides.
    pub async fn resolve(
        &self,
        reference: &str,
        requested_version: Option<&str>,
        override_source: Option<&Url>,
    ) -> Result<PackageMetadata> {
        let source = self.router.source_for(reference);
        let fetched = source.descriptor(reference, requested_version).await?;
        let metadata = DescriptorReader::read(
            &fetched.raw,
            override_source,
            fetched.fork_source.as_ref(),
        )?;

        let metadata = self.reconcile(metadata, override_source).await?;
        tracing::info!(
            "Resolved {}@{} from {}",
            metadata.name,
            metadata.version,
            metadata.source_uri
        );
        Ok(metadata)
    }

    /// Overlay the hosting platform's current URLs.
    async fn reconcile(
        &self,
        metadata: PackageMetadata,
        override_source: Option<&Url>,
    ) -> Result<PackageMetadata> {
        if !self.platform.recognizes(&metadata.source_uri) {
            return Ok(metadata);
        }

        match self.platform.current_urls(&metadata.source_uri).await {
            Ok(urls) => Ok(metadata.with_platform_urls(urls)),
            Err(err) if err.is_not_found() => match override_source {
                Some(uri) => {
                    tracing::warn!(
                        "Repository {} not found on hosting platform, keeping override source",
                        metadata.source_uri
                    );
                    Ok(metadata.with_source_only(uri.clone()))
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }
}
