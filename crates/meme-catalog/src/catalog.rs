//! Catalog loading and keyword resolution.

use crate::descriptor::{RawEntry, TemplateDescriptor};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog document: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Read-only table of templates plus the flattened keyword → template id map.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    templates: HashMap<String, TemplateDescriptor>,
    keywords: HashMap<String, String>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a catalog from descriptors. Aliases are flattened in iteration order, so on a
    /// collision the last descriptor claiming a keyword wins.
    pub fn from_descriptors<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = TemplateDescriptor>,
    {
        let mut templates = HashMap::new();
        let mut keywords = HashMap::new();
        for descriptor in descriptors {
            if let Some(violation) = descriptor.params.bounds_violation() {
                warn!(
                    template = %descriptor.id,
                    violation = %violation,
                    "Template constraints out of order"
                );
            }
            for keyword in &descriptor.keywords {
                keywords.insert(keyword.clone(), descriptor.id.clone());
            }
            templates.insert(descriptor.id.clone(), descriptor);
        }
        Self {
            templates,
            keywords,
        }
    }

    /// Parses the key-level YAML document (`<id>: {keywords, params_type}`).
    pub fn from_yaml_str(document: &str) -> Result<Self, CatalogError> {
        let entries: Option<IndexMap<String, Option<RawEntry>>> = serde_yaml::from_str(document)?;
        let descriptors = entries
            .unwrap_or_default()
            .into_iter()
            .map(|(id, entry)| {
                let entry = entry.unwrap_or_default();
                TemplateDescriptor {
                    id,
                    keywords: entry.keywords,
                    params: entry.params_type,
                }
            });
        Ok(Self::from_descriptors(descriptors))
    }

    /// Loads the catalog from `path`. A missing or malformed document yields an empty catalog;
    /// the bot keeps running and every template falls back to unknown.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(catalog) => {
                info!(
                    path = %path.display(),
                    templates = catalog.len(),
                    keywords = catalog.keyword_count(),
                    "Meme catalog loaded"
                );
                catalog
            }
            Err(CatalogError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    path = %path.display(),
                    "Meme catalog file not found; run `memebot fetch-catalog` to create it"
                );
                Self::empty()
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to load meme catalog");
                Self::empty()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, CatalogError> {
        let document = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&document)
    }

    pub fn lookup(&self, id: &str) -> Option<&TemplateDescriptor> {
        self.templates.get(id)
    }

    /// Maps a keyword alias to its template id; an unknown token is returned unchanged.
    pub fn resolve<'a>(&'a self, token: &'a str) -> &'a str {
        self.keywords.get(token).map(String::as_str).unwrap_or(token)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
happy:
  keywords: ["开心", "happy_face"]
  params_type:
    min_texts: 1
    max_texts: 2
    default_texts: ["我很开心"]
    min_images: 0
    max_images: 0
petpet:
  keywords: ["摸", "摸摸"]
  params_type:
    min_images: 1
    max_images: 1
  tags: ["动图"]
"#;

    #[test]
    fn test_from_yaml_str_builds_descriptors() {
        let catalog = Catalog::from_yaml_str(DOC).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.keyword_count(), 4);

        let happy = catalog.lookup("happy").unwrap();
        assert_eq!(happy.params.min_texts, 1);
        assert_eq!(happy.params.max_texts, 2);
        assert_eq!(happy.params.default_texts, vec!["我很开心".to_string()]);
        assert!(!happy.params.accepts_images());

        let petpet = catalog.lookup("petpet").unwrap();
        assert_eq!(petpet.params.max_images, 1);
        assert!(petpet.params.default_texts.is_empty());
    }

    #[test]
    fn test_resolve_alias_and_fallback() {
        let catalog = Catalog::from_yaml_str(DOC).unwrap();
        assert_eq!(catalog.resolve("摸"), "petpet");
        assert_eq!(catalog.resolve("开心"), "happy");
        assert_eq!(catalog.resolve("bogus"), "bogus");
        assert_eq!(catalog.resolve("happy"), "happy");
    }

    #[test]
    fn test_alias_collision_last_writer_wins() {
        let doc = r#"
first:
  keywords: ["shared"]
second:
  keywords: ["shared"]
"#;
        let catalog = Catalog::from_yaml_str(doc).unwrap();
        assert_eq!(catalog.resolve("shared"), "second");
    }

    #[test]
    fn test_null_entry_and_empty_document() {
        let catalog = Catalog::from_yaml_str("bare:\n").unwrap();
        let bare = catalog.lookup("bare").unwrap();
        assert!(bare.keywords.is_empty());
        assert_eq!(bare.params.max_texts, 0);

        assert!(Catalog::from_yaml_str("").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_document_is_error() {
        assert!(Catalog::from_yaml_str("- just\n- a list\n").is_err());
        assert!(Catalog::from_yaml_str("happy:\n  params_type:\n    min_texts: many\n").is_err());
    }
}
