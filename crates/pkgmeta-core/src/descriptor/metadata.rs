//! Canonical package metadata record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

use crate::platform::PlatformUrls;

/// Fully resolved, normalized metadata for one package version.
///
/// Never partially populated: construction goes through the descriptor
/// reader, and later adjustments produce new copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub homepage: Option<Url>,
    pub source_uri: Url,
    pub issues_url: Option<Url>,
    pub licenses: Vec<String>,
    pub dependencies: BTreeMap<String, String>,
    pub optional_dependencies: BTreeMap<String, String>,
}

impl PackageMetadata {
    /// Replace homepage, source and issues URLs with the platform's current ones.
    pub fn with_platform_urls(&self, urls: PlatformUrls) -> Self {
        Self {
            homepage: Some(urls.homepage),
            source_uri: urls.source_uri,
            issues_url: Some(urls.issues_url),
            ..self.clone()
        }
    }

    /// Keep only the given source URI, clearing homepage and issues URLs.
    pub fn with_source_only(&self, source_uri: Url) -> Self {
        Self {
            homepage: None,
            source_uri,
            issues_url: None,
            ..self.clone()
        }
    }
}
