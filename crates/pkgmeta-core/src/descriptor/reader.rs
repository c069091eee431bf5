//! Descriptor reader: raw JSON document to [`PackageMetadata`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

use super::metadata::PackageMetadata;
use super::schema::{LicenseField, UrlField};
use crate::error::{ResolveError, Result, parse_url};
use crate::platform::derive_issues_url;
use crate::source::normalize;

/// One attempt at pulling a field out of a raw descriptor.
type Extractor<T> = fn(&Value) -> Option<T>;

/// Where the issues URL may come from, in order.
const ISSUES_CHAIN: [Extractor<Url>; 2] = [bugs_url, issues_from_homepage];

/// Where the license list may come from, in order.
const LICENSE_CHAIN: [Extractor<Vec<String>>; 2] = [license_ids, legacy_licenses_ids];

/// Reads raw package descriptors into canonical metadata.
pub struct DescriptorReader;

impl DescriptorReader {
    /// Read a raw descriptor.
    ///
    /// Source URI precedence: `override_source`, then `fork_source`, then the
    /// descriptor's own `repository` field.
    pub fn read(
        raw: &Value,
        override_source: Option<&Url>,
        fork_source: Option<&Url>,
    ) -> Result<PackageMetadata> {
        let name = required_string(raw, "name")?;
        let version = required_string(raw, "version")?;
        let homepage = homepage(raw);
        let source_uri = match override_source {
            Some(uri) => uri.clone(),
            None => source_uri(raw, fork_source)?,
        };
        let issues_url = first_success(raw, &ISSUES_CHAIN);
        let licenses = first_success(raw, &LICENSE_CHAIN).unwrap_or_default();

        let optional_dependencies: BTreeMap<String, String> =
            field_as(raw, "optionalDependencies").unwrap_or_default();
        let mut dependencies: BTreeMap<String, String> =
            field_as(raw, "dependencies").unwrap_or_default();
        dependencies.retain(|dep, _| !optional_dependencies.contains_key(dep));

        Ok(PackageMetadata {
            name,
            version,
            homepage,
            source_uri,
            issues_url,
            licenses,
            dependencies,
            optional_dependencies,
        })
    }
}

fn first_success<T>(raw: &Value, chain: &[Extractor<T>]) -> Option<T> {
    chain.iter().find_map(|extract| extract(raw))
}

fn field_as<T: DeserializeOwned>(raw: &Value, field: &str) -> Option<T> {
    raw.get(field)
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}

fn required_string(raw: &Value, field: &'static str) -> Result<String> {
    raw.get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .ok_or(ResolveError::MissingRequiredField { field })
}

fn homepage(raw: &Value) -> Option<Url> {
    let homepage = raw.get("homepage")?.as_str()?;
    match Url::parse(homepage) {
        Ok(url) => Some(url),
        Err(err) => {
            tracing::debug!("Ignoring unparseable homepage '{}': {}", homepage, err);
            None
        }
    }
}

fn source_uri(raw: &Value, fork_source: Option<&Url>) -> Result<Url> {
    let declared = match fork_source {
        Some(fork) => fork.to_string(),
        None => field_as::<UrlField>(raw, "repository")
            .map(UrlField::into_url)
            .ok_or(ResolveError::MissingRequiredField {
                field: "repository",
            })?,
    };
    parse_url(&normalize(&declared))
}

fn bugs_url(raw: &Value) -> Option<Url> {
    let bugs = field_as::<UrlField>(raw, "bugs")?.into_url();
    Url::parse(&bugs).ok()
}

fn issues_from_homepage(raw: &Value) -> Option<Url> {
    derive_issues_url(&homepage(raw)?)
}

fn license_ids(raw: &Value) -> Option<Vec<String>> {
    field_as::<LicenseField>(raw, "license").map(LicenseField::into_ids)
}

fn legacy_licenses_ids(raw: &Value) -> Option<Vec<String>> {
    field_as::<LicenseField>(raw, "licenses").map(LicenseField::into_ids)
}
