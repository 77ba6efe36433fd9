//! Page manifest management.
//!
//! The manifest (`pages.json`) maps output filenames to the metadata used
//! during composition. A missing or unparsable manifest is fatal to the
//! whole build; everything else degrades per page.

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Manifest-related errors
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Page manifest parsing error")]
    Json(#[from] serde_json::Error),

    #[error("Invalid manifest entry for page `{key}`")]
    Entry {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One `pages.json` entry: everything page-specific that composition needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageEntry {
    /// Template filename under the templates directory
    pub template: String,

    /// Page title for the head/SEO fragment
    pub title: String,

    /// Page description for the head/SEO fragment
    pub description: String,

    /// Social-image path or URL for the head/SEO fragment
    #[serde(rename = "ogImage")]
    pub og_image: String,
}

/// The parsed manifest, in document order.
///
/// Pages are built in insertion order; order carries no semantics (pages are
/// independent) but keeps builds and logs deterministic.
#[derive(Debug, Default)]
pub struct PageManifest {
    pages: Vec<(String, PageEntry)>,
}

impl PageManifest {
    /// Parse a manifest from JSON text
    pub fn from_str(content: &str) -> Result<Self, ManifestError> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)?;

        let pages = raw
            .into_iter()
            .map(|(key, value)| match serde_json::from_value(value) {
                Ok(entry) => Ok((key, entry)),
                Err(source) => Err(ManifestError::Entry { key, source }),
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { pages })
    }

    /// Load a manifest from file path
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content =
            fs::read_to_string(path).map_err(|err| ManifestError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Page entries in document order
    pub fn pages(&self) -> impl Iterator<Item = (&str, &PageEntry)> {
        self.pages.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "index.html": {
            "template": "page.html",
            "title": "Accueil",
            "description": "La carte des sorties",
            "ogImage": "/mapikids-logo-txt.png"
        },
        "stats.html": {
            "template": "page.html",
            "title": "Statistiques",
            "description": "Chiffres de la communauté",
            "ogImage": "/mapikids-logo-txt.png"
        }
    }"#;

    #[test]
    fn test_parse_sample() {
        let manifest = PageManifest::from_str(SAMPLE).unwrap();
        assert_eq!(manifest.len(), 2);

        let (key, entry) = manifest.pages().next().unwrap();
        assert_eq!(key, "index.html");
        assert_eq!(entry.template, "page.html");
        assert_eq!(entry.title, "Accueil");
        assert_eq!(entry.og_image, "/mapikids-logo-txt.png");
    }

    #[test]
    fn test_document_order_preserved() {
        // Keys deliberately in reverse alphabetical order to catch sorting
        let swapped = r#"{
            "zzz.html": {"template": "t.html", "title": "Z", "description": "d", "ogImage": "i"},
            "aaa.html": {"template": "t.html", "title": "A", "description": "d", "ogImage": "i"}
        }"#;
        let manifest = PageManifest::from_str(swapped).unwrap();
        let keys: Vec<_> = manifest.pages().map(|(key, _)| key).collect();
        assert_eq!(keys, ["zzz.html", "aaa.html"]);
    }

    #[test]
    fn test_malformed_json() {
        let result = PageManifest::from_str("{ not json");
        assert!(matches!(result, Err(ManifestError::Json(_))));
    }

    #[test]
    fn test_entry_missing_field_names_page() {
        let incomplete = r#"{
            "index.html": {"template": "page.html", "title": "Accueil"}
        }"#;
        let err = PageManifest::from_str(incomplete).unwrap_err();
        match err {
            ManifestError::Entry { key, .. } => assert_eq!(key, "index.html"),
            other => panic!("expected Entry error, got {other:?}"),
        }
    }

    #[test]
    fn test_entry_unknown_field_rejected() {
        let extra = r#"{
            "index.html": {
                "template": "page.html",
                "title": "Accueil",
                "description": "d",
                "ogImage": "i",
                "unknown": true
            }
        }"#;
        assert!(PageManifest::from_str(extra).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = PageManifest::load(Path::new("/nonexistent/pages.json"));
        assert!(matches!(result, Err(ManifestError::Io(..))));
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = PageManifest::from_str("{}").unwrap();
        assert!(manifest.is_empty());
    }
}
