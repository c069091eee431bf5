//! pkgmeta core library
//!
//! Resolves canonical package metadata from a registry name or a git
//! locator, reconciles it with the hosting platform, and fetches version
//! lists, archives and licenses.

pub mod archive;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod git;
pub mod http;
pub mod license;
pub mod platform;
pub mod registry;
pub mod resolve;
pub mod source;
pub mod version;

pub use error::{ResolveError, Result};

/// Re-exports of commonly used types
pub mod prelude {
    pub use crate::archive::{ArchiveFetcher, PackageArchive};
    pub use crate::config::ResolverConfig;
    pub use crate::context::ResolveContext;
    pub use crate::descriptor::{DescriptorReader, PackageMetadata};
    pub use crate::error::{ResolveError, Result};
    pub use crate::git::{GitFetcher, GitRepositories, GitSpec};
    pub use crate::http::{HttpResponse, HttpTransport, ReqwestTransport};
    pub use crate::license::LicenseDetector;
    pub use crate::platform::{GitHub, HostingPlatform, PlatformUrls};
    pub use crate::registry::{PackageName, RegistrySource};
    pub use crate::resolve::MetadataResolver;
    pub use crate::source::{
        FetchedDescriptor, GitSource, PackageSource, SourceKind, SourceRouter, normalize,
    };
    pub use crate::version::{VersionResolver, compare_versions};
}
