//! Hosting platform lookups
//!
//! Registry metadata goes stale when repositories are renamed, moved or
//! change issue trackers. A hosting platform reports where a repository
//! lives today.

use async_trait::async_trait;
use url::Url;

use crate::error::Result;

mod github;

pub use github::GitHub;

/// Current project URLs as reported by the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformUrls {
    pub homepage: Url,
    pub source_uri: Url,
    pub issues_url: Url,
}

/// A code hosting platform that can report a repository's current URLs.
#[async_trait]
pub trait HostingPlatform: std::fmt::Debug + Send + Sync {
    /// Whether `uri` points at a repository on this platform.
    fn recognizes(&self, uri: &Url) -> bool;

    /// Look up the current URLs.
    ///
    /// Fails with [`ResolveError::RepositoryNotFound`](crate::error::ResolveError::RepositoryNotFound)
    /// when the repository no longer exists at that location.
    async fn current_urls(&self, uri: &Url) -> Result<PlatformUrls>;
}

/// Known issue trackers: accepted hosts, canonical host, path suffix.
const ISSUE_TRACKERS: [(&[&str], &str, &str); 3] = [
    (&["github.com", "www.github.com"], "github.com", "issues"),
    (&["bitbucket.org", "www.bitbucket.org"], "bitbucket.org", "issues"),
    (&["gitlab.com", "www.gitlab.com"], "gitlab.com", "-/issues"),
];

/// Split a repository URL path into `(owner, repo)`, dropping a `.git` suffix.
pub(crate) fn owner_and_repo(uri: &Url) -> Option<(String, String)> {
    let mut segments = uri.path_segments()?.filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

/// Derive an issue tracker URL from a project homepage on a known platform.
pub fn derive_issues_url(homepage: &Url) -> Option<Url> {
    let host = homepage.host_str()?;
    ISSUE_TRACKERS
        .iter()
        .find(|(hosts, _, _)| hosts.contains(&host))
        .and_then(|(_, canonical, suffix)| {
            let (owner, repo) = owner_and_repo(homepage)?;
            Url::parse(&format!("https://{}/{}/{}/{}", canonical, owner, repo, suffix)).ok()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issues(homepage: &str) -> Option<String> {
        derive_issues_url(&Url::parse(homepage).unwrap()).map(|u| u.to_string())
    }

    #[test]
    fn github_homepage() {
        assert_eq!(
            issues("https://github.com/webjars/webjars#readme").as_deref(),
            Some("https://github.com/webjars/webjars/issues")
        );
        assert_eq!(
            issues("https://www.github.com/webjars/webjars.git").as_deref(),
            Some("https://github.com/webjars/webjars/issues")
        );
    }

    #[test]
    fn bitbucket_homepage() {
        assert_eq!(
            issues("https://bitbucket.org/owner/repo/src/master").as_deref(),
            Some("https://bitbucket.org/owner/repo/issues")
        );
    }

    #[test]
    fn gitlab_homepage() {
        assert_eq!(
            issues("https://gitlab.com/owner/repo?x=1").as_deref(),
            Some("https://gitlab.com/owner/repo/-/issues")
        );
    }

    #[test]
    fn unknown_host_or_short_path() {
        assert_eq!(issues("https://example.com/owner/repo"), None);
        assert_eq!(issues("https://github.com/owner"), None);
    }

    #[test]
    fn owner_and_repo_strips_git_suffix() {
        let uri = Url::parse("ssh://git@github.com/org/repo.git").unwrap();
        assert_eq!(
            owner_and_repo(&uri),
            Some(("org".to_string(), "repo".to_string()))
        );
    }
}
