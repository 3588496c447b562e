//! C/C++ AST entity extraction
//!
//! Parses one translation unit at a time with tree-sitter and records four
//! kinds of entities in visitation order: function declarations, call
//! expressions, variable declarations and identifier references.
//!
//! ```no_run
//! use ast_analyzer::AstAnalyzer;
//!
//! let mut analyzer = AstAnalyzer::new();
//! if analyzer.parse_file("main.cc") {
//!     for function in analyzer.functions() {
//!         println!("{} at {}", function.name, function.location);
//!     }
//! }
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod language;
pub mod utils;

pub use analyzer::{
    analyze_files, AnalysisResults, AstAnalyzer, BatchFileResult, CallExpression,
    FunctionDeclaration, IdentifierReference, Location, Parameter, VariableDeclaration,
};
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, Result};
pub use language::{ParserConfig, SourceLanguage};
