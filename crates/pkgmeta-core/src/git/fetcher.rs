//! Git fetcher backed by bare mirrors.
//!
//! Each repository is mirrored once under `<state_dir>/git/` and refreshed
//! (heads and tags) on every call, so results always reflect the remote.
//! Mirror updates for one repository are serialized, and a first clone is
//! staged in a sibling directory and renamed into place, so a mirror is
//! never observed half-created.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;
use git2::{ObjectType, Repository, Sort};
use url::Url;

use super::{GitRepositories, GitSpec};
use crate::error::{ResolveError, Result};

/// Prefix for every entry of an exported archive.
const ARCHIVE_ROOT: &str = "package";

type MirrorLocks = Arc<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>>;

/// Fetches git repositories into bare mirrors and reads from them.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    state_dir: PathBuf,
    mirror_locks: MirrorLocks,
}

impl GitFetcher {
    /// Create a new GitFetcher with the given state directory.
    pub fn new(state_dir: PathBuf) -> Self {
        Self {
            state_dir,
            mirror_locks: MirrorLocks::default(),
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Run blocking git work off the async runtime.
    async fn blocking<T, F>(&self, locator: &str, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(GitFetcher) -> anyhow::Result<T> + Send + 'static,
    {
        let fetcher = self.clone();
        let outcome = match tokio::task::spawn_blocking(move || work(fetcher)).await {
            Ok(result) => result,
            Err(join_err) => Err(anyhow::anyhow!("Git task failed: {}", join_err)),
        };
        outcome.map_err(|source| ResolveError::Git {
            locator: locator.to_string(),
            source,
        })
    }

    fn mirror_lock(&self, bare_dir: &Path) -> anyhow::Result<Arc<Mutex<()>>> {
        let mut locks = self
            .mirror_locks
            .lock()
            .map_err(|_| anyhow::anyhow!("Mirror lock table poisoned"))?;
        Ok(Arc::clone(locks.entry(bare_dir.to_path_buf()).or_default()))
    }

    /// Ensure the bare mirror exists and is up to date.
    fn ensure_mirror(&self, repo_url: &str) -> anyhow::Result<PathBuf> {
        let bare_dir = GitSpec::new(repo_url).bare_repo_dir(&self.state_dir);
        let lock = self.mirror_lock(&bare_dir)?;
        let _guard = lock
            .lock()
            .map_err(|_| anyhow::anyhow!("Mirror lock poisoned: {}", bare_dir.display()))?;

        if bare_dir.exists() {
            Self::run_git(
                Some(&bare_dir),
                &[
                    "fetch",
                    "--prune",
                    "--force",
                    "origin",
                    "+refs/heads/*:refs/heads/*",
                    "+refs/tags/*:refs/tags/*",
                ],
            )?;
            return Ok(bare_dir);
        }

        let parent = bare_dir
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Bare repo directory has no parent"))?;
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create git cache directory: {}", parent.display())
        })?;

        let staging = tempfile::Builder::new()
            .prefix(".clone-")
            .tempdir_in(parent)
            .context("Failed to create staging directory for clone")?;
        let staged_repo = staging.path().join("mirror.git");

        Self::run_git(
            None,
            &[
                "clone",
                "--bare",
                "--",
                repo_url,
                staged_repo
                    .to_str()
                    .ok_or_else(|| anyhow::anyhow!("Invalid staging dir"))?,
            ],
        )?;

        // Another process may have published the mirror meanwhile; theirs wins.
        match std::fs::rename(&staged_repo, &bare_dir) {
            Ok(()) => {}
            Err(_) if bare_dir.exists() => {}
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Failed to move mirror into place: {}", bare_dir.display())
                });
            }
        }

        Ok(bare_dir)
    }

    /// Tag names of a repository, in no particular order.
    fn tags(&self, repo_url: &str) -> anyhow::Result<Vec<String>> {
        let bare_dir = self.ensure_mirror(repo_url)?;
        let repo = Repository::open_bare(&bare_dir)
            .with_context(|| format!("Failed to open mirror {}", bare_dir.display()))?;
        let names = repo.tag_names(None)?;
        Ok(names.iter().flatten().map(str::to_string).collect())
    }

    /// Commit ids reachable from a branch, newest first.
    fn branch_commits(&self, repo_url: &str, branch: &str) -> anyhow::Result<Vec<String>> {
        let bare_dir = self.ensure_mirror(repo_url)?;
        let repo = Repository::open_bare(&bare_dir)?;
        let head = repo
            .revparse_single(&format!("refs/heads/{}", branch))
            .with_context(|| format!("Branch not found: {}", branch))?
            .peel_to_commit()?;

        let mut revwalk = repo.revwalk()?;
        revwalk.push(head.id())?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        revwalk
            .map(|oid| Ok(oid?.to_string()))
            .collect::<anyhow::Result<Vec<_>>>()
    }

    /// Read a file at a revision without a checkout.
    fn show_file(&self, repo_url: &str, version: &str, file_path: &str) -> anyhow::Result<String> {
        let bare_dir = self.ensure_mirror(repo_url)?;
        let repo = Repository::open_bare(&bare_dir)?;
        let blob = repo
            .revparse_single(&format!("{}:{}", version, file_path))
            .and_then(|object| object.peel_to_blob())
            .with_context(|| {
                format!("File not found in repository: {}@{}", file_path, version)
            })?;

        String::from_utf8(blob.content().to_vec()).context("File content is not valid UTF-8")
    }

    /// Export a revision as a gzip-compressed tar, skipping excluded directories.
    fn export(&self, repo_url: &str, version: &str, exclude: &[String]) -> anyhow::Result<Vec<u8>> {
        let bare_dir = self.ensure_mirror(repo_url)?;
        let repo = Repository::open_bare(&bare_dir)?;
        let object = repo
            .revparse_single(version)
            .with_context(|| format!("Revision not found: {}", version))?;
        let mtime = object
            .peel_to_commit()
            .map(|commit| commit.time().seconds().max(0) as u64)
            .unwrap_or(0);
        let tree = object.peel_to_tree()?;

        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        Self::append_tree(&repo, &tree, Path::new(ARCHIVE_ROOT), exclude, mtime, &mut builder)?;
        let mut encoder = builder.into_inner()?;
        encoder.flush()?;
        Ok(encoder.finish()?)
    }

    fn append_tree<W: Write>(
        repo: &Repository,
        tree: &git2::Tree,
        prefix: &Path,
        exclude: &[String],
        mtime: u64,
        builder: &mut tar::Builder<W>,
    ) -> anyhow::Result<()> {
        for entry in tree.iter() {
            let name = entry
                .name()
                .ok_or_else(|| anyhow::anyhow!("Tree entry name is not valid UTF-8"))?;
            let path = prefix.join(name);

            match entry.kind() {
                Some(ObjectType::Tree) => {
                    if exclude.iter().any(|excluded| excluded == name) {
                        continue;
                    }
                    let subtree = repo.find_tree(entry.id())?;
                    Self::append_tree(repo, &subtree, &path, exclude, mtime, builder)?;
                }
                Some(ObjectType::Blob) => {
                    let blob = repo.find_blob(entry.id())?;
                    let mut header = tar::Header::new_gnu();
                    header.set_mtime(mtime);
                    if entry.filemode() == 0o120000 {
                        let target = std::str::from_utf8(blob.content())
                            .context("Symlink target is not valid UTF-8")?;
                        header.set_entry_type(tar::EntryType::Symlink);
                        header.set_size(0);
                        header.set_mode(0o777);
                        header.set_link_name(target)?;
                        builder.append_data(&mut header, &path, std::io::empty())?;
                    } else {
                        let mode = if entry.filemode() & 0o111 != 0 { 0o755 } else { 0o644 };
                        header.set_entry_type(tar::EntryType::Regular);
                        header.set_size(blob.content().len() as u64);
                        header.set_mode(mode);
                        builder.append_data(&mut header, &path, blob.content())?;
                    }
                }
                // Submodule commits have no content in this repository.
                _ => {}
            }
        }
        Ok(())
    }

    /// Run a git command.
    fn run_git(cwd: Option<&Path>, args: &[&str]) -> anyhow::Result<()> {
        let mut cmd = Command::new("git");
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        let output = cmd
            .output()
            .with_context(|| format!("Failed to run git {:?}", args))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git command failed {:?}: {}", args, stderr.trim());
        }
        Ok(())
    }
}

#[async_trait]
impl GitRepositories for GitFetcher {
    fn is_git_locator(&self, reference: &str) -> bool {
        GitSpec::is_locator(reference)
    }

    async fn canonical_url(&self, locator: &str) -> Result<Url> {
        GitSpec::parse(locator).canonical_url()
    }

    async fn list_versions(&self, locator: &str) -> Result<Vec<String>> {
        let repo_url = GitSpec::parse(locator).repo_url;
        tracing::debug!("Listing tags of {}", repo_url);
        self.blocking(locator, move |fetcher| fetcher.tags(&repo_url))
            .await
    }

    async fn list_versions_on_branch(&self, url: &Url, branch: &str) -> Result<Vec<String>> {
        let repo_url = url.to_string();
        let branch = branch.to_string();
        self.blocking(url.as_str(), move |fetcher| {
            fetcher.branch_commits(&repo_url, &branch)
        })
        .await
    }

    async fn read_file(&self, locator: &str, version: &str, path: &str) -> Result<String> {
        let repo_url = GitSpec::parse(locator).repo_url;
        let version = version.to_string();
        let path = path.to_string();
        self.blocking(locator, move |fetcher| {
            fetcher.show_file(&repo_url, &version, &path)
        })
        .await
    }

    async fn export_archive(
        &self,
        locator: &str,
        version: &str,
        exclude: &[String],
    ) -> Result<Vec<u8>> {
        let repo_url = GitSpec::parse(locator).repo_url;
        let version = version.to_string();
        let exclude = exclude.to_vec();
        tracing::debug!("Exporting {}@{} (excluding {:?})", repo_url, version, exclude);
        self.blocking(locator, move |fetcher| {
            fetcher.export(&repo_url, &version, &exclude)
        })
        .await
    }
}
