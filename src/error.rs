// Error types for the AST analyzer
//
// Failures only surface at the parse boundary. Per-node extraction never
// produces an error; missing data becomes an empty or absent field instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Main error type for analyzer operations
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// The source file could not be read
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The grammar could not be loaded into the parser session
    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser returned no tree for the file
    #[error("parser produced no translation unit for '{}'", path.display())]
    Parse { path: PathBuf },

    /// Unknown `language` value in configuration
    #[error("unsupported language '{0}' (expected \"c++\" or \"c\")")]
    UnsupportedLanguage(String),

    /// Configuration file could not be read or decoded
    #[error("invalid configuration '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// A rendered location did not have the `file:line:column` shape
    #[error("invalid location '{0}': expected <filename>:<line>:<column>")]
    InvalidLocation(String),
}

impl AnalyzerError {
    /// Creates a configuration error
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}
