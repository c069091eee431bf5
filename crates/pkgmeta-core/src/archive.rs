//! Distribution archives.

use flate2::read::GzDecoder;
use std::io::{Cursor, Read};

use crate::error::{ResolveError, Result};
use crate::source::SourceRouter;

/// A package archive, already decompressed to a tar payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageArchive {
    file_name: String,
    tar: Vec<u8>,
}

impl PackageArchive {
    /// Decompress a gzip stream and check that it holds a readable tar.
    pub fn from_gzip(file_name: impl Into<String>, compressed: &[u8]) -> Result<Self> {
        let file_name = file_name.into();
        if compressed.is_empty() {
            return Err(ResolveError::ArchiveRetrieval {
                detail: format!("{} is empty", file_name),
                source: std::io::ErrorKind::UnexpectedEof.into(),
            });
        }

        let mut tar = Vec::new();
        GzDecoder::new(compressed)
            .read_to_end(&mut tar)
            .map_err(|source| ResolveError::ArchiveRetrieval {
                detail: format!("Failed to decompress {}", file_name),
                source,
            })?;

        let archive = Self { file_name, tar };
        archive.entry_paths()?;
        Ok(archive)
    }

    /// `{name}-{version}.tgz`
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Paths of every entry in the tar.
    pub fn entry_paths(&self) -> Result<Vec<String>> {
        let corrupt = |source: std::io::Error| ResolveError::ArchiveRetrieval {
            detail: format!("{} is not a valid tar archive", self.file_name),
            source,
        };

        let mut archive = tar::Archive::new(self.tar.as_slice());
        let mut paths = Vec::new();
        for entry in archive.entries().map_err(corrupt)? {
            let entry = entry.map_err(corrupt)?;
            let path = entry.path().map_err(corrupt)?;
            paths.push(path.to_string_lossy().into_owned());
        }
        Ok(paths)
    }

    pub fn len(&self) -> usize {
        self.tar.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tar.is_empty()
    }

    pub fn into_reader(self) -> impl Read {
        Cursor::new(self.tar)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.tar
    }
}

/// Downloads archives through whichever source owns the reference.
#[derive(Debug, Clone)]
pub struct ArchiveFetcher {
    router: SourceRouter,
}

impl ArchiveFetcher {
    pub fn new(router: SourceRouter) -> Self {
        Self { router }
    }

    pub async fn archive(&self, reference: &str, version: &str) -> Result<PackageArchive> {
        self.router
            .source_for(reference)
            .archive(reference, version)
            .await
    }
}
