//! The closed stereotype taxonomy.
//!
//! The label sets are fixed by the classifier rules; a side file can narrow
//! or restate them, and every label the engine emits is validated against
//! the loaded taxonomy before the annotated archive is written.

use crate::core::{ClassStereotype, MethodStereotype, Result, StereomapError};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Taxonomy {
    labels: HashSet<String>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        let mut labels = HashSet::new();
        for label in MethodStereotype::all() {
            labels.insert(label.as_str().to_string());
        }
        for label in ClassStereotype::all() {
            labels.insert(label.as_str().to_string());
        }
        Self { labels }
    }
}

impl Taxonomy {
    /// Loads a taxonomy file: one label per line, `#` comments and blank
    /// lines ignored.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| StereomapError::io(path, &e))?;
        let labels: HashSet<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect();
        if labels.is_empty() {
            return Err(StereomapError::Config(format!(
                "taxonomy file {} lists no labels",
                path.display()
            )));
        }
        Ok(Self { labels })
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Checks that every emitted label belongs to the taxonomy.
    pub fn check_method_labels(&self, labels: &[MethodStereotype]) -> Result<()> {
        for label in labels {
            if !self.contains(label.as_str()) {
                return Err(StereomapError::TaxonomyViolation {
                    label: label.as_str().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn check_class_labels(&self, labels: &[ClassStereotype]) -> Result<()> {
        for label in labels {
            if !self.contains(label.as_str()) {
                return Err(StereomapError::TaxonomyViolation {
                    label: label.as_str().to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_taxonomy_accepts_every_label() {
        let taxonomy = Taxonomy::default();
        assert!(taxonomy
            .check_method_labels(&[MethodStereotype::Get, MethodStereotype::CopyConstructor])
            .is_ok());
        assert!(taxonomy
            .check_class_labels(&[ClassStereotype::LazyClass, ClassStereotype::DataClass])
            .is_ok());
    }

    #[test]
    fn narrowed_taxonomy_rejects_missing_labels() {
        let taxonomy = Taxonomy {
            labels: ["get".to_string()].into_iter().collect(),
        };
        assert!(taxonomy.check_method_labels(&[MethodStereotype::Get]).is_ok());
        assert!(matches!(
            taxonomy.check_method_labels(&[MethodStereotype::Set]),
            Err(StereomapError::TaxonomyViolation { .. })
        ));
    }
}
