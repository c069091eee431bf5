//! npm-style package registry.
//!
//! Registry documents are fetched over [`HttpTransport`](crate::http::HttpTransport);
//! URL construction for plain and scoped names lives in [`PackageName`].

mod names;
mod source;

pub use names::PackageName;
pub use source::RegistrySource;
