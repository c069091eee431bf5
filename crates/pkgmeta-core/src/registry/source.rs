//! Registry-backed package source.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

use super::PackageName;
use crate::archive::PackageArchive;
use crate::error::{ResolveError, Result};
use crate::http::HttpTransport;
use crate::source::{FetchedDescriptor, PackageSource, SourceKind};
use crate::version::ordering::sort_newest_first;

/// Serves packages from an npm-compatible registry.
#[derive(Debug, Clone)]
pub struct RegistrySource {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
}

impl RegistrySource {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn fetch_json(&self, url: &str) -> Result<Value> {
        tracing::debug!("Fetching registry document {}", url);
        self.transport.get(url).await?.error_for_status(url)?.json()
    }

    /// Scoped packages have no per-version documents, so the version is
    /// picked out of the full document.
    async fn scoped_descriptor(
        &self,
        name: &PackageName<'_>,
        version: Option<&str>,
    ) -> Result<Value> {
        let document = self.fetch_json(&name.document_url(&self.base_url)).await?;

        let version = match version {
            Some(version) => version,
            None => document
                .pointer("/dist-tags/latest")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ResolveError::version_not_resolvable(
                        name.as_str(),
                        "registry document declares no latest dist-tag",
                    )
                })?,
        };

        document
            .get("versions")
            .and_then(|versions| versions.get(version))
            .cloned()
            .ok_or_else(|| {
                ResolveError::version_not_resolvable(
                    name.as_str(),
                    format!("version {} is not in the registry document", version),
                )
            })
    }
}

#[async_trait]
impl PackageSource for RegistrySource {
    fn kind(&self) -> SourceKind {
        SourceKind::Registry
    }

    async fn versions(&self, reference: &str) -> Result<Vec<String>> {
        let name = PackageName::new(reference);
        let document = self.fetch_json(&name.document_url(&self.base_url)).await?;

        let mut versions: Vec<String> = document
            .get("versions")
            .and_then(Value::as_object)
            .map(|versions| versions.keys().cloned().collect())
            .unwrap_or_default();
        sort_newest_first(&mut versions);
        Ok(versions)
    }

    async fn descriptor(
        &self,
        reference: &str,
        version: Option<&str>,
    ) -> Result<FetchedDescriptor> {
        let name = PackageName::new(reference);
        let raw = if name.is_scoped() {
            self.scoped_descriptor(&name, version).await?
        } else {
            let url = name.version_url(&self.base_url, version.unwrap_or("latest"));
            self.fetch_json(&url).await?
        };
        Ok(FetchedDescriptor::new(raw))
    }

    async fn archive(&self, reference: &str, version: &str) -> Result<PackageArchive> {
        let name = PackageName::new(reference);
        let url = name.archive_url(&self.base_url, version);
        tracing::debug!("Downloading archive {}", url);

        let response = self.transport.get(&url).await?.error_for_status(&url)?;
        PackageArchive::from_gzip(name.archive_file_name(version), &response.body)
    }
}
