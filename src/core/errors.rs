//! Typed errors for stereotype analysis.
//!
//! Fatal conditions (malformed archive, missing primitive-table language)
//! surface as errors; per-query XPath failures never do — absence of a
//! query result is semantically meaningful, so the engine maps evaluation
//! failures to "no results" at each call site.

use std::path::PathBuf;

/// Errors raised while loading inputs or driving the annotation pass.
#[derive(Debug, thiserror::Error)]
pub enum StereomapError {
    /// The input archive is not well-formed XML or lacks required structure.
    #[error("malformed archive: {message}")]
    MalformedArchive { message: String },

    /// A unit is missing its `language` attribute entirely.
    #[error("unit {unit} has no language attribute")]
    MissingLanguage { unit: usize },

    /// File system failures with the offending path attached.
    #[error("I/O error on {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// The primitive type table has no entries for a required language.
    #[error("primitive type table has no entries for {language}")]
    MissingPrimitives { language: String },

    /// A catalog XPath expression failed to compile. These expressions are
    /// fixed at build time, so this indicates a programming error rather
    /// than bad input.
    #[error("invalid catalog XPath ({kind}): {message}")]
    Catalog { kind: String, message: String },

    /// An emitted label is not present in the configured taxonomy.
    #[error("label {label:?} is not in the stereotype taxonomy")]
    TaxonomyViolation { label: String },

    /// Configuration file or option errors.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StereomapError {
    pub fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        StereomapError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        StereomapError::MalformedArchive {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StereomapError>;
