//! Resolver configuration
//!
//! Endpoints, git export settings and the state directory, loaded from a
//! `pkgmeta.toml` file or built from defaults.

pub mod parser;
pub mod schema;

use std::path::Path;

pub use parser::{parse_config_toml, parse_config_toml_str};
pub use schema::ResolverConfig;

use crate::error::Result;

impl ResolverConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        parse_config_toml(path)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        parse_config_toml_str(content)
    }
}
