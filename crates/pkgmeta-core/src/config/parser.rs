//! TOML parser with helpful error messages

use std::path::Path;

use super::schema::ResolverConfig;
use crate::error::{ResolveError, Result};

/// Parse pkgmeta.toml with detailed error messages
pub fn parse_config_toml(path: &Path) -> Result<ResolverConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ResolveError::Config(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config_toml_str(&content).map_err(|e| match e {
        ResolveError::Config(msg) => {
            ResolveError::Config(format!("{} ({})", msg, path.display()))
        }
        other => other,
    })
}

/// Parse pkgmeta.toml content from string
pub fn parse_config_toml_str(content: &str) -> Result<ResolverConfig> {
    let config: ResolverConfig =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;

    config.validate()?;

    Ok(config)
}

/// Enhance TOML parsing errors with the offending line
fn enhance_toml_error(error: toml::de::Error, content: &str) -> ResolveError {
    let line_hint = error
        .span()
        .map(|span| content[..span.start.min(content.len())].matches('\n').count() + 1);

    match line_hint {
        Some(line_num) => ResolveError::Config(format!(
            "TOML parsing error at line {}:\n{}\n\nError: {}",
            line_num,
            get_line_context(content, line_num),
            error.message()
        )),
        None => ResolveError::Config(format!("TOML parsing error: {}", error.message())),
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 2).min(lines.len());

    lines[start.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
