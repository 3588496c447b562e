//! Analyzer configuration
//!
//! Loaded from an optional `config.toml`. Every section has a default, so an
//! empty file is the same as no file at all.
//!
//! ```toml
//! workspace_root = "/home/me/project"
//!
//! [parser]
//! language = "c++"
//! standard = "c++11"
//! ```

use crate::error::{AnalyzerError, Result};
use crate::language::ParserConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Grammar selection and language standard
    pub parser: ParserConfig,
    /// When set, location filenames are stored relative to this directory
    pub workspace_root: Option<PathBuf>,
}

impl AnalyzerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AnalyzerError::config(path, e.to_string()))?;
        let config = Self::from_toml(&text).map_err(|e| match e {
            AnalyzerError::Config { message, .. } => AnalyzerError::config(path, message),
            other => other,
        })?;
        debug!(
            "Loaded config from {}: {:?}",
            path.display(),
            config.parser.as_args()
        );
        Ok(config)
    }

    /// Decode configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| AnalyzerError::config("<inline>", e.to_string()))
    }
}
