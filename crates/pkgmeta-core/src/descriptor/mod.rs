//! Package descriptor parsing.
//!
//! A descriptor is the raw JSON document published by a registry or found as
//! `package.json` in a git repository. Its license, bugs and repository
//! fields appear in several shapes; the reader tries each known shape in a
//! fixed order and produces one canonical [`PackageMetadata`].

mod metadata;
mod reader;
pub mod schema;

pub use metadata::PackageMetadata;
pub use reader::DescriptorReader;
