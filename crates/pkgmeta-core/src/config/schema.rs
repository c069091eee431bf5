//! Configuration schema for pkgmeta.toml
//!
//! Every field has a default so an empty file (or no file) yields a
//! configuration that talks to the public npm registry and GitHub.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::error::{ResolveError, Result};

/// Root configuration structure for pkgmeta.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Base URL of the package registry
    #[serde(default = "default_registry_url")]
    pub registry_url: Url,

    /// Base URL of the GitHub REST API
    #[serde(default = "default_github_api_url")]
    pub github_api_url: Url,

    /// License lookup service for hosted repositories
    #[serde(default = "default_license_host_url")]
    pub license_host_url: Url,

    /// License classification service for raw file contents
    #[serde(default = "default_license_classifier_url")]
    pub license_classifier_url: Url,

    /// User-Agent header sent with every HTTP request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Descriptor file read from git repositories
    #[serde(default = "default_descriptor_file")]
    pub descriptor_file: String,

    /// Directory names left out of git archive exports
    #[serde(default = "default_archive_excludes")]
    pub archive_excludes: Vec<String>,

    /// Where bare git mirrors are kept (defaults to the user cache dir)
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
}

fn default_registry_url() -> Url {
    Url::parse("https://registry.npmjs.org").expect("static URL")
}

fn default_github_api_url() -> Url {
    Url::parse("https://api.github.com").expect("static URL")
}

fn default_license_host_url() -> Url {
    Url::parse("https://github-license-service.herokuapp.com").expect("static URL")
}

fn default_license_classifier_url() -> Url {
    Url::parse("https://oss-license-detector.herokuapp.com").expect("static URL")
}

fn default_user_agent() -> String {
    format!("pkgmeta/{}", env!("CARGO_PKG_VERSION"))
}

fn default_descriptor_file() -> String {
    "package.json".to_string()
}

fn default_archive_excludes() -> Vec<String> {
    vec!["node_modules".to_string()]
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            registry_url: default_registry_url(),
            github_api_url: default_github_api_url(),
            license_host_url: default_license_host_url(),
            license_classifier_url: default_license_classifier_url(),
            user_agent: default_user_agent(),
            descriptor_file: default_descriptor_file(),
            archive_excludes: default_archive_excludes(),
            state_dir: None,
        }
    }
}

impl ResolverConfig {
    /// Validate configuration values that serde cannot check.
    pub fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            return Err(ResolveError::Config(
                "'user_agent' must not be empty".to_string(),
            ));
        }
        if self.descriptor_file.trim().is_empty() {
            return Err(ResolveError::Config(
                "'descriptor_file' must not be empty".to_string(),
            ));
        }
        if self.archive_excludes.iter().any(|name| name.contains('/')) {
            return Err(ResolveError::Config(
                "'archive_excludes' entries are directory names, not paths".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory holding git mirrors and other scratch state.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("pkgmeta")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ResolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.registry_url.as_str(), "https://registry.npmjs.org/");
        assert_eq!(config.archive_excludes, vec!["node_modules".to_string()]);
        assert!(config.user_agent.starts_with("pkgmeta/"));
    }

    #[test]
    fn test_validate_rejects_empty_user_agent() {
        let config = ResolverConfig {
            user_agent: "  ".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("user_agent"));
    }

    #[test]
    fn test_validate_rejects_path_excludes() {
        let config = ResolverConfig {
            archive_excludes: vec!["a/b".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_state_dir_wins() {
        let config = ResolverConfig {
            state_dir: Some(PathBuf::from("/tmp/pkgmeta-state")),
            ..Default::default()
        };
        assert_eq!(config.state_dir(), PathBuf::from("/tmp/pkgmeta-state"));
    }
}
