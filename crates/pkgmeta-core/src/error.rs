//! Error types for package metadata resolution.

use thiserror::Error;

/// Errors raised while resolving, fetching or classifying a package.
///
/// Every variant carries enough detail (field name, response body or locator)
/// to diagnose the failure without re-querying the upstream.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Malformed repository locator '{locator}': {source}")]
    MalformedLocator {
        locator: String,
        source: url::ParseError,
    },

    #[error("Package descriptor is missing required field '{field}'")]
    MissingRequiredField { field: &'static str },

    #[error("Upstream request to {url} failed with HTTP {status}: {body}")]
    UpstreamUnavailable {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Repository not found on hosting platform: {uri}")]
    RepositoryNotFound { uri: String },

    #[error("Could not resolve a version for '{reference}': {reason}")]
    VersionNotResolvable { reference: String, reason: String },

    #[error("Failed to retrieve archive: {detail}")]
    ArchiveRetrieval {
        detail: String,
        source: std::io::Error,
    },

    #[error("Git operation failed for '{locator}': {source:#}")]
    Git {
        locator: String,
        source: anyhow::Error,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ResolveError {
    /// Build an upstream failure from a response status and body.
    pub fn upstream(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Build a version resolution failure.
    pub fn version_not_resolvable(
        reference: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::VersionNotResolvable {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// True when the hosting platform reported the repository as gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RepositoryNotFound { .. })
    }
}

/// A specialized Result type for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Parse a URL, mapping failures to [`ResolveError::MalformedLocator`].
pub(crate) fn parse_url(locator: &str) -> Result<url::Url> {
    url::Url::parse(locator).map_err(|source| ResolveError::MalformedLocator {
        locator: locator.to_string(),
        source,
    })
}
