//! Field shapes found in package descriptors.
//!
//! The same logical field shows up in several incompatible JSON shapes
//! across registries and eras; each shape is modelled as its own variant.

use serde::Deserialize;

/// A URL-bearing field: `"https://..."` or `{ "url": "https://..." }`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UrlField {
    Direct(String),
    Object { url: String },
}

impl UrlField {
    pub fn into_url(self) -> String {
        match self {
            Self::Direct(url) | Self::Object { url } => url,
        }
    }
}

/// A single license entry: `"MIT"` or `{ "type": "MIT", "url": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LicenseEntry {
    Id(String),
    Object {
        #[serde(rename = "type")]
        kind: String,
    },
}

impl LicenseEntry {
    pub fn into_id(self) -> String {
        match self {
            Self::Id(id) | Self::Object { kind: id } => id,
        }
    }
}

/// The `license` / `licenses` field in any of its shapes.
///
/// Variants are attempted in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LicenseField {
    /// `["MIT", "Apache-2.0"]`
    Ids(Vec<String>),
    /// `"MIT"`
    Id(String),
    /// `{ "type": "MIT" }`
    Object {
        #[serde(rename = "type")]
        kind: String,
    },
    /// `[{ "type": "MIT" }, { "type": "Apache-2.0" }]` (also tolerates mixed entries)
    Objects(Vec<LicenseEntry>),
}

impl LicenseField {
    pub fn into_ids(self) -> Vec<String> {
        match self {
            Self::Ids(ids) => ids,
            Self::Id(id) | Self::Object { kind: id } => vec![id],
            Self::Objects(entries) => entries.into_iter().map(LicenseEntry::into_id).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_field_accepts_both_shapes() {
        let direct: UrlField = serde_json::from_value(json!("https://x.test")).unwrap();
        let object: UrlField =
            serde_json::from_value(json!({"url": "https://x.test", "type": "git"})).unwrap();
        assert_eq!(direct.into_url(), "https://x.test");
        assert_eq!(object.into_url(), "https://x.test");
    }

    #[test]
    fn url_field_rejects_object_without_url() {
        assert!(serde_json::from_value::<UrlField>(json!({"email": "a@b.c"})).is_err());
    }

    #[test]
    fn license_field_shapes() {
        let cases = [
            (json!("MIT"), vec!["MIT"]),
            (json!(["MIT", "ISC"]), vec!["MIT", "ISC"]),
            (json!({"type": "MIT", "url": "u"}), vec!["MIT"]),
            (
                json!([{"type": "MIT"}, {"type": "Apache-2.0"}]),
                vec!["MIT", "Apache-2.0"],
            ),
            (json!([{"type": "MIT"}, "BSD-3-Clause"]), vec!["MIT", "BSD-3-Clause"]),
        ];
        for (value, expected) in cases {
            let field: LicenseField = serde_json::from_value(value).unwrap();
            assert_eq!(field.into_ids(), expected);
        }
    }

    #[test]
    fn license_field_rejects_unknown_shapes() {
        assert!(serde_json::from_value::<LicenseField>(json!(42)).is_err());
        assert!(serde_json::from_value::<LicenseField>(json!({"name": "MIT"})).is_err());
    }
}
