//! GitHub repository URL lookups.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

use super::{HostingPlatform, PlatformUrls, owner_and_repo};
use crate::error::{ResolveError, Result, parse_url};
use crate::http::HttpTransport;

const GITHUB_HOSTS: [&str; 2] = ["github.com", "www.github.com"];

/// Subset of the GitHub repository resource we rely on.
#[derive(Debug, Clone, Deserialize)]
struct GitHubRepository {
    html_url: Url,
    clone_url: Url,
}

/// Looks up repositories through the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHub {
    transport: Arc<dyn HttpTransport>,
    api_url: Url,
}

impl GitHub {
    pub fn new(transport: Arc<dyn HttpTransport>, api_url: Url) -> Self {
        Self { transport, api_url }
    }

    /// Construct the API URL for a repository.
    ///
    /// `https://github.com/org/repo.git` -> `{api}/repos/org/repo`
    pub fn repository_api_url(&self, uri: &Url) -> Option<String> {
        let (owner, repo) = owner_and_repo(uri)?;
        Some(format!(
            "{}/repos/{}/{}",
            self.api_url.as_str().trim_end_matches('/'),
            owner,
            repo
        ))
    }
}

#[async_trait]
impl HostingPlatform for GitHub {
    fn recognizes(&self, uri: &Url) -> bool {
        uri.host_str()
            .is_some_and(|host| GITHUB_HOSTS.contains(&host))
            && owner_and_repo(uri).is_some()
    }

    async fn current_urls(&self, uri: &Url) -> Result<PlatformUrls> {
        let api_url = self
            .repository_api_url(uri)
            .ok_or_else(|| ResolveError::RepositoryNotFound {
                uri: uri.to_string(),
            })?;

        let response = self.transport.get(&api_url).await?;
        if response.status == 404 {
            return Err(ResolveError::RepositoryNotFound {
                uri: uri.to_string(),
            });
        }
        let repository: GitHubRepository = response.error_for_status(&api_url)?.json()?;

        let issues_url = parse_url(&format!(
            "{}/issues",
            repository.html_url.as_str().trim_end_matches('/')
        ))?;

        Ok(PlatformUrls {
            homepage: repository.html_url,
            source_uri: repository.clone_url,
            issues_url,
        })
    }
}
