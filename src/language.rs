//! Language Support - tree-sitter grammar selection and the fixed parser policy
//!
//! The analyzer parses every file as C++11 unless the integration layer says
//! otherwise. That policy lives here, next to the grammar lookup, so the
//! traversal code never has to know which grammar produced the tree.

use crate::error::AnalyzerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Language standard passed along with the default C++ dialect
pub const DEFAULT_STANDARD: &str = "c++11";

/// Source dialect a translation unit is parsed as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SourceLanguage {
    #[default]
    #[serde(rename = "c++", alias = "cpp", alias = "cxx")]
    Cpp,
    #[serde(rename = "c")]
    C,
}

impl SourceLanguage {
    /// Get the tree-sitter grammar for this dialect
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            SourceLanguage::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            SourceLanguage::C => tree_sitter_c::LANGUAGE.into(),
        }
    }

    /// Detect the dialect from a file extension (without the leading dot)
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "c" | "h" => Some(SourceLanguage::C),
            "cpp" | "cc" | "cxx" | "c++" | "hpp" | "hh" | "hxx" | "h++" | "ipp" | "tpp" => {
                Some(SourceLanguage::Cpp)
            }
            _ => None,
        }
    }

    /// Detect the dialect from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Name as it appears after `-x` on a clang command line
    pub fn as_str(self) -> &'static str {
        match self {
            SourceLanguage::Cpp => "c++",
            SourceLanguage::C => "c",
        }
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceLanguage {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c++" | "cpp" | "cxx" => Ok(SourceLanguage::Cpp),
            "c" => Ok(SourceLanguage::C),
            other => Err(AnalyzerError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Parser configuration handed to every new parser session
///
/// Defaults to `-x c++ -std=c++11`. The grammar accepts a superset of any
/// single standard, so `standard` travels with the results as metadata and
/// is not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub language: SourceLanguage,
    pub standard: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            language: SourceLanguage::Cpp,
            standard: DEFAULT_STANDARD.to_string(),
        }
    }
}

impl ParserConfig {
    /// Clang-style argument list, used for logging
    pub fn as_args(&self) -> Vec<String> {
        vec![
            "-x".to_string(),
            self.language.as_str().to_string(),
            format!("-std={}", self.standard),
        ]
    }
}
