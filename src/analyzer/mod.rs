//! AST analyzer - pre-order extraction of functions, calls, variables and references
//!
//! An [`AstAnalyzer`] owns one parser session and at most one parsed
//! translation unit. [`AstAnalyzer::parse_file`] walks the whole tree before
//! returning, appending one record per classified node to one of four
//! collections, in visitation order (parent before children, siblings in
//! source order).
//!
//! The walk always recurses, so a call inside a function body is seen even
//! though the function itself was already recorded. The collections are
//! therefore not disjoint: the callee name of `foo(x)` is also an
//! identifier reference.

mod batch;
mod handlers;
mod node;
mod types;


pub use batch::{analyze_files, BatchFileResult};
pub use types::{
    AnalysisResults, CallExpression, FunctionDeclaration, IdentifierReference, Location,
    Parameter, VariableDeclaration,
};

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tree_sitter::{Node, Parser, Tree};

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};
use crate::language::ParserConfig;
use crate::utils::paths::display_path;
use node::{EntityKind, Frame, NodeReader};

/// One parsed source file
struct TranslationUnit {
    filename: String,
    source: Vec<u8>,
    tree: Tree,
}

/// Extracts four record collections from one C/C++ translation unit at a time
///
/// Each instance has its own parser session, so separate instances can run
/// on separate threads. A single instance handles one file at a time; parsing
/// again replaces everything the previous parse produced.
pub struct AstAnalyzer {
    config: AnalyzerConfig,
    parser: Parser,
    unit: Option<TranslationUnit>,
    functions: Vec<FunctionDeclaration>,
    calls: Vec<CallExpression>,
    variables: Vec<VariableDeclaration>,
    references: Vec<IdentifierReference>,
}

impl Default for AstAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl AstAnalyzer {
    /// Create an analyzer with the default `-x c++ -std=c++11` policy
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self {
            config,
            parser: Parser::new(),
            unit: None,
            functions: Vec::new(),
            calls: Vec::new(),
            variables: Vec::new(),
            references: Vec::new(),
        }
    }

    pub fn parser_config(&self) -> &ParserConfig {
        &self.config.parser
    }

    /// Parse `path` and rebuild all four collections
    ///
    /// Returns `false` when no translation unit could be produced (missing or
    /// unreadable file, grammar failure). The collections are then empty.
    /// Files with syntax errors still parse; whatever the parser recovered is
    /// walked.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.try_parse_file(path) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to parse {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Like [`parse_file`](Self::parse_file), but reports why parsing failed
    pub fn try_parse_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.reset();

        let source = std::fs::read(path).map_err(|source| AnalyzerError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = display_path(path, self.config.workspace_root.as_deref());
        self.parse_source(filename, source)
    }

    /// Parse in-memory source, recording `filename` in every location
    pub fn parse_source(
        &mut self,
        filename: impl Into<String>,
        source: impl Into<Vec<u8>>,
    ) -> Result<()> {
        self.reset();
        let filename = filename.into();
        let source = source.into();

        self.parser
            .set_language(&self.config.parser.language.tree_sitter_language())?;
        let tree = self
            .parser
            .parse(&source, None)
            .ok_or_else(|| AnalyzerError::Parse {
                path: PathBuf::from(&filename),
            })?;

        if tree.root_node().has_error() {
            warn!(
                "{} has syntax errors; extracting from the recovered tree",
                filename
            );
        }

        let unit = TranslationUnit {
            filename,
            source,
            tree,
        };
        self.walk_unit(&unit);

        debug!(
            "Analyzed {} ({}): {} functions, {} calls, {} variables, {} references",
            unit.filename,
            self.config.parser.as_args().join(" "),
            self.functions.len(),
            self.calls.len(),
            self.variables.len(),
            self.references.len()
        );

        self.unit = Some(unit);
        Ok(())
    }

    fn reset(&mut self) {
        self.unit = None;
        self.functions.clear();
        self.calls.clear();
        self.variables.clear();
        self.references.clear();
    }

    /// Pre-order walk of the whole tree; every subtree is entered
    ///
    /// Iterative so that deeply nested expressions (long `a + b + ...`
    /// chains nest one level per operator) cannot exhaust the stack.
    fn walk_unit(&mut self, unit: &TranslationUnit) {
        let reader = NodeReader::new(&unit.source, &unit.filename);
        let mut cursor = unit.tree.walk();
        let mut ancestors: Vec<Frame> = Vec::new();

        loop {
            let node = cursor.node();
            let field = cursor.field_name();
            self.dispatch(&reader, node, field, &ancestors);

            if cursor.goto_first_child() {
                ancestors.push(Frame {
                    kind: node.kind(),
                    field,
                });
                continue;
            }

            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    return;
                }
                ancestors.pop();
            }
        }
    }

    fn dispatch(
        &mut self,
        reader: &NodeReader,
        node: Node,
        field: Option<&str>,
        ancestors: &[Frame],
    ) {
        match node::classify(&node, field, ancestors, reader.source()) {
            Some(EntityKind::FunctionDecl) => self
                .functions
                .push(handlers::function_declaration(reader, node)),
            Some(EntityKind::CallExpr) => {
                self.calls.push(handlers::call_expression(reader, node))
            }
            Some(EntityKind::VarDecl) => self
                .variables
                .push(handlers::variable_declaration(reader, node)),
            Some(EntityKind::DeclRefExpr) => self
                .references
                .push(handlers::identifier_reference(reader, node)),
            None => {}
        }
    }

    /// Filename of the current translation unit, if a parse succeeded
    pub fn filename(&self) -> Option<&str> {
        self.unit.as_ref().map(|unit| unit.filename.as_str())
    }

    pub fn functions(&self) -> &[FunctionDeclaration] {
        &self.functions
    }

    pub fn calls(&self) -> &[CallExpression] {
        &self.calls
    }

    pub fn variables(&self) -> &[VariableDeclaration] {
        &self.variables
    }

    pub fn references(&self) -> &[IdentifierReference] {
        &self.references
    }

    /// Owned copy of the four collections
    pub fn results(&self) -> AnalysisResults {
        AnalysisResults {
            filename: self.filename().unwrap_or_default().to_string(),
            functions: self.functions.clone(),
            calls: self.calls.clone(),
            variables: self.variables.clone(),
            references: self.references.clone(),
        }
    }
}
