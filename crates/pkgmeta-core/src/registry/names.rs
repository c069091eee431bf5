//! Registry package names and the URLs built from them.

use url::Url;

/// A registry package name, plain (`jquery`) or scoped (`@angular/core`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageName<'a> {
    name: &'a str,
}

impl<'a> PackageName<'a> {
    pub fn new(name: &'a str) -> Self {
        Self { name }
    }

    pub fn as_str(&self) -> &'a str {
        self.name
    }

    pub fn is_scoped(&self) -> bool {
        self.name.starts_with('@') && self.name.contains('/')
    }

    /// Name without its scope: `@angular/core` -> `core`.
    pub fn unscoped(&self) -> &'a str {
        match self.name.split_once('/') {
            Some((_, rest)) if self.is_scoped() => rest,
            _ => self.name,
        }
    }

    /// The name as a single URL path segment.
    ///
    /// `/` is always encoded; `@` only when a version follows in the path.
    pub fn url_segment(&self, versioned: bool) -> String {
        let encoded = self.name.replace('/', "%2F");
        if versioned {
            encoded.replace('@', "%40")
        } else {
            encoded
        }
    }

    /// `{base}/{name}`: the full document with every version.
    pub fn document_url(&self, base: &Url) -> String {
        format!("{}/{}", trim_base(base), self.url_segment(false))
    }

    /// `{base}/{name}/{version}`: a single version's descriptor.
    pub fn version_url(&self, base: &Url, version: &str) -> String {
        let version: String = url::form_urlencoded::byte_serialize(version.as_bytes()).collect();
        format!("{}/{}/{}", trim_base(base), self.url_segment(true), version)
    }

    /// `{base}/{scope?}/{name}/-/{name}-{version}.tgz`
    pub fn archive_url(&self, base: &Url, version: &str) -> String {
        format!(
            "{}/{}/-/{}",
            trim_base(base),
            self.name,
            self.archive_file_name(version)
        )
    }

    pub fn archive_file_name(&self, version: &str) -> String {
        format!("{}-{}.tgz", self.unscoped(), version)
    }
}

fn trim_base(base: &Url) -> &str {
    base.as_str().trim_end_matches('/')
}
