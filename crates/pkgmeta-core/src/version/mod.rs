//! Version listing and ordering.

pub mod ordering;
mod resolver;

pub use ordering::{compare_versions, newest_first, sort_newest_first};
pub use resolver::VersionResolver;
