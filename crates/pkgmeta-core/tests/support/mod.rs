//! Fake collaborators shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use url::Url;

use pkgmeta_core::config::ResolverConfig;
use pkgmeta_core::context::ResolveContext;
use pkgmeta_core::error::{ResolveError, Result};
use pkgmeta_core::git::{GitRepositories, GitSpec};
use pkgmeta_core::http::{HttpResponse, HttpTransport};
use pkgmeta_core::platform::{HostingPlatform, PlatformUrls};

pub const REGISTRY: &str = "https://registry.test";

/// Configuration pointing every service at test hosts.
pub fn test_config() -> ResolverConfig {
    ResolverConfig {
        registry_url: Url::parse(REGISTRY).unwrap(),
        github_api_url: Url::parse("https://api.github.test").unwrap(),
        license_host_url: Url::parse("https://licenses.test").unwrap(),
        license_classifier_url: Url::parse("https://classifier.test/detect").unwrap(),
        ..ResolverConfig::default()
    }
}

pub fn context(
    transport: Arc<FakeTransport>,
    git: Arc<FakeGit>,
    platform: Arc<FakePlatform>,
) -> ResolveContext {
    ResolveContext::with_collaborators(test_config(), transport, git, platform)
}

/// Canned HTTP responses keyed by URL; unknown URLs answer 404.
#[derive(Debug, Default)]
pub struct FakeTransport {
    gets: Mutex<HashMap<String, HttpResponse>>,
    posts: Mutex<HashMap<String, HttpResponse>>,
    calls: Mutex<Vec<String>>,
    posted: Mutex<Vec<String>>,
    unreachable: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_get(&self, url: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.gets
            .lock()
            .unwrap()
            .insert(url.to_string(), HttpResponse::new(status, body));
    }

    pub fn on_get_json(&self, url: &str, value: Value) {
        self.on_get(url, 200, value.to_string());
    }

    pub fn on_post(&self, url: &str, status: u16, body: &str) {
        self.posts
            .lock()
            .unwrap()
            .insert(url.to_string(), HttpResponse::new(status, body));
    }

    /// Make requests to `url` fail before any response arrives.
    pub fn unreachable(&self, url: &str) {
        self.unreachable.lock().unwrap().push(url.to_string());
    }

    fn check_reachable(&self, url: &str) -> Result<()> {
        if self.unreachable.lock().unwrap().iter().any(|u| u == url) {
            return Err(ResolveError::upstream(url, 0, "connection refused"));
        }
        Ok(())
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Bodies posted so far, in order.
    pub fn posted(&self) -> Vec<String> {
        self.posted.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.calls.lock().unwrap().push(url.to_string());
        self.check_reachable(url)?;
        Ok(self
            .gets
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| HttpResponse::new(404, "not found")))
    }

    async fn post(&self, url: &str, body: String) -> Result<HttpResponse> {
        self.calls.lock().unwrap().push(url.to_string());
        self.posted.lock().unwrap().push(body);
        self.check_reachable(url)?;
        Ok(self
            .posts
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| HttpResponse::new(404, "not found")))
    }
}

/// Git collaborator serving one in-memory repository for every locator.
#[derive(Debug, Default)]
pub struct FakeGit {
    pub tags: Vec<String>,
    pub branch_commits: Vec<String>,
    pub files: HashMap<(String, String), String>,
    pub archive: Vec<u8>,
    pub listed: Mutex<Vec<String>>,
    pub exports: Mutex<Vec<(String, String, Vec<String>)>>,
}

impl FakeGit {
    pub fn with_tags(tags: &[&str]) -> Self {
        Self {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_file(mut self, version: &str, path: &str, content: &str) -> Self {
        self.files
            .insert((version.to_string(), path.to_string()), content.to_string());
        self
    }
}

#[async_trait]
impl GitRepositories for FakeGit {
    fn is_git_locator(&self, reference: &str) -> bool {
        GitSpec::is_locator(reference)
    }

    async fn canonical_url(&self, locator: &str) -> Result<Url> {
        GitSpec::parse(locator).canonical_url()
    }

    async fn list_versions(&self, locator: &str) -> Result<Vec<String>> {
        self.listed.lock().unwrap().push(locator.to_string());
        Ok(self.tags.clone())
    }

    async fn list_versions_on_branch(&self, _url: &Url, _branch: &str) -> Result<Vec<String>> {
        Ok(self.branch_commits.clone())
    }

    async fn read_file(&self, locator: &str, version: &str, path: &str) -> Result<String> {
        self.files
            .get(&(version.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| ResolveError::Git {
                locator: locator.to_string(),
                source: anyhow::anyhow!("File not found in repository: {}@{}", path, version),
            })
    }

    async fn export_archive(
        &self,
        locator: &str,
        version: &str,
        exclude: &[String],
    ) -> Result<Vec<u8>> {
        self.exports.lock().unwrap().push((
            locator.to_string(),
            version.to_string(),
            exclude.to_vec(),
        ));
        Ok(self.archive.clone())
    }
}

/// What the fake platform answers for a recognized repository.
#[derive(Debug, Clone)]
pub enum PlatformOutcome {
    Urls(PlatformUrls),
    NotFound,
    Unavailable,
}

/// Hosting platform recognizing `github.com` URIs only.
#[derive(Debug)]
pub struct FakePlatform {
    recognizes_anything: bool,
    outcome: PlatformOutcome,
    queried: Mutex<Vec<Url>>,
}

impl FakePlatform {
    pub fn answering(outcome: PlatformOutcome) -> Arc<Self> {
        Arc::new(Self {
            recognizes_anything: true,
            outcome,
            queried: Mutex::new(Vec::new()),
        })
    }

    /// A platform that recognizes no repository at all.
    pub fn ignoring() -> Arc<Self> {
        Arc::new(Self {
            recognizes_anything: false,
            outcome: PlatformOutcome::NotFound,
            queried: Mutex::new(Vec::new()),
        })
    }

    pub fn queried(&self) -> Vec<Url> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostingPlatform for FakePlatform {
    fn recognizes(&self, uri: &Url) -> bool {
        self.recognizes_anything && uri.host_str() == Some("github.com")
    }

    async fn current_urls(&self, uri: &Url) -> Result<PlatformUrls> {
        self.queried.lock().unwrap().push(uri.clone());
        match &self.outcome {
            PlatformOutcome::Urls(urls) => Ok(urls.clone()),
            PlatformOutcome::NotFound => Err(ResolveError::RepositoryNotFound {
                uri: uri.to_string(),
            }),
            PlatformOutcome::Unavailable => Err(ResolveError::upstream(
                "https://api.github.test/repos",
                502,
                "bad gateway",
            )),
        }
    }
}

pub fn platform_urls(homepage: &str, source: &str, issues: &str) -> PlatformUrls {
    PlatformUrls {
        homepage: Url::parse(homepage).unwrap(),
        source_uri: Url::parse(source).unwrap(),
        issues_url: Url::parse(issues).unwrap(),
    }
}

/// Log output captured from the current thread until the guard drops.
pub fn capture_logs() -> (Arc<Mutex<Vec<u8>>>, tracing::subscriber::DefaultGuard) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = Arc::clone(&buffer);
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || LogWriter(Arc::clone(&writer)))
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}

pub fn logged(buffer: &Mutex<Vec<u8>>) -> String {
    String::from_utf8_lossy(&buffer.lock().unwrap()).into_owned()
}

struct LogWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogWriter {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Gzip-compressed tar holding the given files.
pub fn tgz(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, path, content.as_bytes())
            .unwrap();
    }
    let tar = builder.into_inner().unwrap();

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&tar).unwrap();
    encoder.finish().unwrap()
}
