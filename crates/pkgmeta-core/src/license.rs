//! License detection.
//!
//! Two independent lookups: a hosted license service that knows repositories
//! by locator, and a classifier that identifies a license from file text.

use std::sync::Arc;
use url::Url;

use crate::error::{ResolveError, Result};
use crate::http::HttpTransport;

/// Branch tried when the default branch has no license.
const FALLBACK_BRANCH: &str = "gh-pages";

#[derive(Debug, Clone)]
pub struct LicenseDetector {
    transport: Arc<dyn HttpTransport>,
    host_url: Url,
    classifier_url: Url,
}

impl LicenseDetector {
    pub fn new(transport: Arc<dyn HttpTransport>, host_url: Url, classifier_url: Url) -> Self {
        Self {
            transport,
            host_url,
            classifier_url,
        }
    }

    /// Look up the license of a hosted repository (`owner/repo`).
    ///
    /// Falls back once to the `gh-pages` branch; no delay, no further retries.
    pub async fn detect_from_host(&self, locator: &str) -> Result<String> {
        let url = format!(
            "{}/{}",
            self.host_url.as_str().trim_end_matches('/'),
            locator.trim_matches('/')
        );
        let response = self.transport.get(&url).await?;
        if response.is_success() {
            return Ok(response.text());
        }

        let fallback = format!("{}/{}", url, FALLBACK_BRANCH);
        tracing::debug!(
            "License lookup for {} returned {}, trying {}",
            locator,
            response.status,
            fallback
        );
        let response = self.transport.get(&fallback).await?;
        Ok(response.error_for_status(&fallback)?.text())
    }

    /// Identify the license in `contents`.
    pub async fn classify(&self, contents: &str) -> Result<String> {
        let url = self.classifier_url.as_str();
        let err = match self.transport.post(url, contents.to_string()).await {
            Ok(response) if response.is_success() => return Ok(response.text()),
            Ok(response) => ResolveError::upstream(url, response.status, response.text()),
            Err(err) => err,
        };
        tracing::error!("License classification failed: {}", err);
        Err(err)
    }
}
