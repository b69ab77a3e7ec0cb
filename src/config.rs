//! Configuration for a stereomap run.
//!
//! Values resolve in the usual order: built-in defaults, then an optional
//! TOML config file, then command-line flags.

use crate::core::{Result, StereomapError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Classes with more countable methods than this can be labelled
/// `large-class`.
pub const DEFAULT_METHODS_PER_CLASS_THRESHOLD: usize = 21;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StereomapConfig {
    /// Method-count threshold for the `large-class` rule.
    #[serde(default = "default_threshold")]
    pub methods_per_class_threshold: usize,

    /// Replacement primitive type table (see `primitives`).
    #[serde(default)]
    pub primitives: Option<PathBuf>,

    /// Stereotype taxonomy file used for label validation.
    #[serde(default)]
    pub taxonomy: Option<PathBuf>,
}

fn default_threshold() -> usize {
    DEFAULT_METHODS_PER_CLASS_THRESHOLD
}

impl Default for StereomapConfig {
    fn default() -> Self {
        Self {
            methods_per_class_threshold: default_threshold(),
            primitives: None,
            taxonomy: None,
        }
    }
}

impl StereomapConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| StereomapError::io(path, &e))?;
        let config: StereomapConfig = toml::from_str(&text)
            .map_err(|e| StereomapError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.methods_per_class_threshold == 0 {
            return Err(StereomapError::Config(
                "methods_per_class_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
