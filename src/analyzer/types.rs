// Record types produced by the analyzer
//
// Every record is a flat, immutable value derived from exactly one visited
// node. Records never point at each other; consumers correlate by name and
// location.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyzerError;

/// Normalized source position of a node
///
/// Lines and columns are 1-based. Columns count bytes, matching clang.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Location {
    pub filename: String,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(filename: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            filename: filename.into(),
            line,
            column,
        }
    }
}

/// Renders as `<filename>:<line>:<column>`
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// Parses the `Display` form back. The last two `:`-separated fields are the
/// line and column, so filenames that contain `:` survive the round trip.
impl FromStr for Location {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnalyzerError::InvalidLocation(s.to_string());

        let mut parts = s.rsplitn(3, ':');
        let column = parts.next().ok_or_else(invalid)?;
        let line = parts.next().ok_or_else(invalid)?;
        let filename = parts.next().ok_or_else(invalid)?;

        Ok(Location {
            filename: filename.to_string(),
            line: line.parse().map_err(|_| invalid())?,
            column: column.parse().map_err(|_| invalid())?,
        })
    }
}

/// One formal parameter of a function declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Empty for unnamed parameters
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A function declaration or definition
///
/// Each occurrence produces its own record, so a prototype followed by the
/// definition yields two records with the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub return_type: String,
    /// True only when this occurrence has a body
    pub is_definition: bool,
    /// In declaration order
    pub parameters: Vec<Parameter>,
    pub location: Location,
}

/// A call site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallExpression {
    /// Best-effort callee spelling: the bare name for `f(..)`, `ns::f(..)`,
    /// `obj.f(..)` and `f<T>(..)`, otherwise the callee's source text
    pub function_name: String,
    /// Argument source spellings in call-site order
    pub arguments: Vec<String>,
    pub location: Location,
}

/// A variable declaration at any scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// Present only when the declarator has an initializer
    pub init_value: Option<String>,
    pub location: Location,
}

/// A use of a name inside an expression
///
/// Not linked to the declaration it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierReference {
    pub name: String,
    pub location: Location,
}

/// Owned snapshot of everything extracted from one translation unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AnalysisResults {
    pub filename: String,
    pub functions: Vec<FunctionDeclaration>,
    pub calls: Vec<CallExpression>,
    pub variables: Vec<VariableDeclaration>,
    pub references: Vec<IdentifierReference>,
}

impl AnalysisResults {
    /// Total number of records across the four collections
    pub fn len(&self) -> usize {
        self.functions.len() + self.calls.len() + self.variables.len() + self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
