//! Template descriptor as stored in the catalog document.

use serde::{Deserialize, Serialize};

/// Parameter constraints of one template. A max of 0 means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamsType {
    pub min_texts: usize,
    pub max_texts: usize,
    pub default_texts: Vec<String>,
    pub min_images: usize,
    pub max_images: usize,
}

impl ParamsType {
    /// Whether the template takes image arguments at all.
    pub fn accepts_images(&self) -> bool {
        self.min_images > 0 || self.max_images > 0
    }

    /// Returns a description of the first violated `min <= max` bound, if any.
    pub fn bounds_violation(&self) -> Option<String> {
        if self.max_texts > 0 && self.min_texts > self.max_texts {
            return Some(format!(
                "min_texts {} > max_texts {}",
                self.min_texts, self.max_texts
            ));
        }
        if self.max_images > 0 && self.min_images > self.max_images {
            return Some(format!(
                "min_images {} > max_images {}",
                self.min_images, self.max_images
            ));
        }
        None
    }
}

/// One template: its identifier, keyword aliases and parameter constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDescriptor {
    pub id: String,
    pub keywords: Vec<String>,
    pub params: ParamsType,
}

/// Entry shape inside the key-level YAML document. Other fields written by the
/// fetch utility (tags, shortcuts, dates) are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawEntry {
    pub keywords: Vec<String>,
    pub params_type: ParamsType,
}
