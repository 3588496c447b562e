//! Node queries over the tree-sitter C/C++ grammars
//!
//! Everything the handlers need to know about a node goes through here:
//! its entity kind, spellings, declared types, indexed sub-nodes and
//! location. The rest of the analyzer never inspects grammar node kinds.

use tree_sitter::Node;

use super::types::Location;

/// The four node tags the analyzer records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntityKind {
    FunctionDecl,
    CallExpr,
    VarDecl,
    DeclRefExpr,
}

/// Kind of an ancestor on the walk path, and the field it occupies in its own parent
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub kind: &'static str,
    pub field: Option<&'static str>,
}

/// Nodes whose `declarator` children declare entities
const DECLARATION_OWNERS: &[&str] = &["declaration", "condition_declaration", "for_range_loop"];

/// Node kinds that spell a declared name
const NAME_KINDS: &[&str] = &[
    "identifier",
    "field_identifier",
    "qualified_identifier",
    "operator_name",
    "destructor_name",
    "template_function",
];

/// Names a `function_declarator` may carry for a free function
const FUNCTION_NAME_KINDS: &[&str] = &[
    "identifier",
    "qualified_identifier",
    "operator_name",
    "template_function",
];

/// Declarator wrappers between a declaration and the name it declares
const DECLARATOR_WRAPPERS: &[&str] = &[
    "init_declarator",
    "pointer_declarator",
    "reference_declarator",
    "array_declarator",
    "function_declarator",
    "parenthesized_declarator",
    "attributed_declarator",
    "variadic_declarator",
];

/// Parents whose identifier children are names, never uses
const NAME_ONLY_PARENTS: &[&str] = &[
    "reference_declarator",
    "parenthesized_declarator",
    "attributed_declarator",
    "structured_binding_declarator",
    "variadic_declarator",
    "destructor_name",
    "using_declaration",
    "attribute",
    "preproc_params",
    "preproc_defined",
];

/// Parents whose `name` field introduces a new name
const NAMED_DECLARATIONS: &[&str] = &[
    "enumerator",
    "preproc_def",
    "preproc_function_def",
    "preproc_ifdef",
    "concept_definition",
];

/// Cast operators that parse as template calls (`static_cast<int>(x)`)
const CAST_KEYWORDS: &[&str] = &[
    "static_cast",
    "dynamic_cast",
    "const_cast",
    "reinterpret_cast",
];

const PARAMETER_KINDS: &[&str] = &[
    "parameter_declaration",
    "optional_parameter_declaration",
    "variadic_parameter_declaration",
];

/// Classify a visited node by its syntactic role
///
/// `field` is the field the node occupies in its parent and `ancestors` is
/// the walk path from the root down to (and including) the parent.
pub(crate) fn classify(
    node: &Node,
    field: Option<&str>,
    ancestors: &[Frame],
    source: &[u8],
) -> Option<EntityKind> {
    let parent = ancestors.last().map(|frame| frame.kind);

    match node.kind() {
        "function_definition" => function_name(*node).map(|_| EntityKind::FunctionDecl),
        "call_expression" => (!is_cast(node, source)).then_some(EntityKind::CallExpr),
        _ if field == Some("declarator")
            && parent.is_some_and(|kind| DECLARATION_OWNERS.contains(&kind)) =>
        {
            if function_name(*node).is_some() {
                Some(EntityKind::FunctionDecl)
            } else {
                Some(EntityKind::VarDecl)
            }
        }
        "identifier" if is_cast_keyword(node, field, parent, source) => None,
        "identifier" if is_reference(field, ancestors) => Some(EntityKind::DeclRefExpr),
        _ => None,
    }
}

fn is_cast_name(name: &Node, source: &[u8]) -> bool {
    name.utf8_text(source)
        .is_ok_and(|text| CAST_KEYWORDS.contains(&text))
}

/// `static_cast<T>(x)` and friends: a cast, not a call
fn is_cast(call: &Node, source: &[u8]) -> bool {
    call.child_by_field_name("function")
        .filter(|callee| callee.kind() == "template_function")
        .and_then(|callee| callee.child_by_field_name("name"))
        .is_some_and(|name| is_cast_name(&name, source))
}

/// The operator keyword of a cast, which names nothing
fn is_cast_keyword(
    node: &Node,
    field: Option<&str>,
    parent: Option<&str>,
    source: &[u8],
) -> bool {
    field == Some("name") && parent == Some("template_function") && is_cast_name(node, source)
}

/// Whether an `identifier` in this position uses a name rather than declaring one
fn is_reference(field: Option<&str>, ancestors: &[Frame]) -> bool {
    let mut field = field;
    let mut depth = ancestors.len();

    // `ns::value` and `make<T>` take the role of their enclosing name
    while depth > 0
        && field == Some("name")
        && matches!(
            ancestors[depth - 1].kind,
            "qualified_identifier" | "template_function"
        )
    {
        field = ancestors[depth - 1].field;
        depth -= 1;
    }

    let Some(parent) = depth.checked_sub(1).map(|i| ancestors[i]) else {
        return false;
    };

    if matches!(field, Some("declarator") | Some("label")) {
        return false;
    }
    if NAME_ONLY_PARENTS.contains(&parent.kind) {
        return false;
    }
    if field == Some("name") && NAMED_DECLARATIONS.contains(&parent.kind) {
        return false;
    }

    !in_preprocessor_condition(field, &ancestors[..depth])
}

/// `#if FOO > 1` names macros, not declarations
fn in_preprocessor_condition(field: Option<&str>, path: &[Frame]) -> bool {
    path.iter().enumerate().any(|(i, frame)| {
        matches!(frame.kind, "preproc_if" | "preproc_elif")
            && path.get(i + 1).map_or(field, |child| child.field) == Some("condition")
    })
}

/// Step one level into a declarator
fn inner_declarator<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if let Some(inner) = node.child_by_field_name("declarator") {
        return Some(inner);
    }
    let mut cursor = node.walk();
    let inner = node.named_children(&mut cursor).find(|child| {
        !matches!(
            child.kind(),
            "attribute_declaration"
                | "type_qualifier"
                | "ms_call_modifier"
                | "ms_pointer_modifier"
                | "ms_based_modifier"
                | "comment"
        )
    });
    inner
}

/// Find the `function_declarator` a declarator chain ends in, looking
/// through pointer and reference return types
pub(crate) fn function_declarator<'t>(declarator: Node<'t>) -> Option<Node<'t>> {
    let mut current = declarator;
    loop {
        match current.kind() {
            "function_declarator" => return Some(current),
            "pointer_declarator" | "reference_declarator" | "attributed_declarator" => {
                current = inner_declarator(current)?;
            }
            _ => return None,
        }
    }
}

/// Name node of the function declared by a `function_definition` or a
/// declarator. `None` for function pointers and in-class members.
pub(crate) fn function_name<'t>(node: Node<'t>) -> Option<Node<'t>> {
    let declarator = if node.kind() == "function_definition" {
        node.child_by_field_name("declarator")?
    } else {
        node
    };
    let name = function_declarator(declarator)?.child_by_field_name("declarator")?;
    FUNCTION_NAME_KINDS.contains(&name.kind()).then_some(name)
}

/// Name node a declarator declares, if it has one
pub(crate) fn declarator_name<'t>(declarator: Node<'t>) -> Option<Node<'t>> {
    let mut current = declarator;
    loop {
        if NAME_KINDS.contains(&current.kind()) {
            return Some(current);
        }
        if !DECLARATOR_WRAPPERS.contains(&current.kind()) {
            return None;
        }
        current = inner_declarator(current)?;
    }
}

/// Last component of a possibly qualified or templated name (`ns::f<T>` → `f`,
/// `obj.template get<T>` → `get`)
pub(crate) fn bare_name<'t>(node: Node<'t>) -> Node<'t> {
    let mut current = node;
    loop {
        let next = match current.kind() {
            "qualified_identifier" | "template_function" | "template_method" => {
                current.child_by_field_name("name")
            }
            "dependent_name" => current.named_child(0),
            _ => None,
        };
        match next {
            Some(name) => current = name,
            None => return current,
        }
    }
}

/// Argument `index` of a call, or `None` past the last argument
pub(crate) fn call_argument<'t>(call: Node<'t>, index: usize) -> Option<Node<'t>> {
    let list = call.child_by_field_name("arguments")?;
    let mut cursor = list.walk();
    let argument = list
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .nth(index);
    argument
}

/// Initializer of a variable declarator, if it has one
///
/// `owner` is the node holding the declarator. Condition declarations
/// (`if (int x = f())`) keep the value on the owner rather than in an
/// `init_declarator`.
pub(crate) fn initializer<'t>(declarator: Node<'t>, owner: Node<'t>) -> Option<Node<'t>> {
    if declarator.kind() == "init_declarator" {
        return declarator.child_by_field_name("value");
    }
    owner.child_by_field_name("value")
}

/// Collapse runs of whitespace into single spaces
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Attach an abstract declarator (`*`, `&`, `[4]`, `(*)(int)`) to a base type
fn join_type(base: String, abstract_declarator: String) -> String {
    if abstract_declarator.is_empty() {
        base
    } else if base.is_empty() {
        abstract_declarator
    } else if abstract_declarator.starts_with('[') {
        format!("{}{}", base, abstract_declarator)
    } else {
        format!("{} {}", base, abstract_declarator)
    }
}

/// Reads node-local data out of one translation unit
pub(crate) struct NodeReader<'a> {
    source: &'a [u8],
    filename: &'a str,
}

impl<'a> NodeReader<'a> {
    pub fn new(source: &'a [u8], filename: &'a str) -> Self {
        Self { source, filename }
    }

    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    fn slice(&self, start: usize, end: usize) -> String {
        if start <= end && end <= self.source.len() {
            String::from_utf8_lossy(&self.source[start..end]).to_string()
        } else {
            String::new()
        }
    }

    /// Raw source text of a node
    pub fn text(&self, node: &Node) -> String {
        self.slice(node.start_byte(), node.end_byte())
    }

    /// Source text with whitespace normalized; the display spelling of a node
    pub fn spelling(&self, node: &Node) -> String {
        normalize_whitespace(&self.text(node))
    }

    /// Spelling of a variable initializer
    ///
    /// Direct-initialization parentheses are dropped, so `int x(5)` and
    /// `int x = 5` both spell `5`.
    pub fn initializer_spelling(&self, init: &Node) -> String {
        let text = self.text(init);
        if init.kind() == "argument_list" {
            if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
                return normalize_whitespace(inner);
            }
        }
        normalize_whitespace(&text)
    }

    /// Spelling of `outer` with `inner` cut out
    fn spelling_without(&self, outer: &Node, inner: &Node) -> String {
        if inner.start_byte() < outer.start_byte() || inner.end_byte() > outer.end_byte() {
            return self.spelling(outer);
        }
        let mut text = self.slice(outer.start_byte(), inner.start_byte());
        text.push_str(&self.slice(inner.end_byte(), outer.end_byte()));
        normalize_whitespace(&text)
    }

    pub fn location(&self, node: &Node) -> Location {
        let position = node.start_position();
        Location::new(
            self.filename,
            position.row as u32 + 1,
            position.column as u32 + 1,
        )
    }

    /// Qualifiers and type specifier of a declaration-like node (`const unsigned int`)
    pub fn base_type(&self, owner: &Node) -> String {
        let mut parts = Vec::new();
        let mut cursor = owner.walk();
        for child in owner.children(&mut cursor) {
            if child.kind() == "type_qualifier" {
                parts.push(self.spelling(&child));
            }
        }
        if let Some(type_node) = owner.child_by_field_name("type") {
            parts.push(self.spelling(&type_node));
        }
        parts.join(" ")
    }

    /// Full type spelling of one declarator of `owner`
    ///
    /// `name` is cut out of the declarator, leaving the abstract declarator
    /// that modifies the base type. Without a name the declarator is already
    /// abstract (`int *` parameters).
    pub fn declared_type(
        &self,
        owner: &Node,
        declarator: Option<Node>,
        name: Option<Node>,
    ) -> String {
        let base = self.base_type(owner);
        let abstract_declarator = match (declarator, name) {
            (Some(declarator), Some(name)) => self.spelling_without(&declarator, &name),
            (Some(declarator), None) => self.spelling(&declarator),
            (None, _) => String::new(),
        };
        join_type(base, abstract_declarator)
    }

    /// Return type of a function, honouring `auto f() -> T`
    pub fn return_type(
        &self,
        owner: &Node,
        declarator: Option<Node>,
        function_declarator: Option<Node>,
    ) -> String {
        if let Some(fd) = function_declarator {
            let mut cursor = fd.walk();
            let trailing = fd
                .named_children(&mut cursor)
                .find(|child| child.kind() == "trailing_return_type");
            if let Some(trailing) = trailing {
                let spelling = self.spelling(&trailing);
                return spelling
                    .strip_prefix("->")
                    .unwrap_or(&spelling)
                    .trim()
                    .to_string();
            }
        }

        match (declarator, function_declarator) {
            (Some(declarator), Some(fd)) => {
                join_type(self.base_type(owner), self.spelling_without(&declarator, &fd))
            }
            _ => self.base_type(owner),
        }
    }

    /// Formal parameter nodes of a function declarator, in declaration order
    pub fn parameters<'t>(&self, function_declarator: Node<'t>) -> Vec<Node<'t>> {
        let Some(list) = function_declarator.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut cursor = list.walk();
        let params: Vec<Node<'t>> = list
            .named_children(&mut cursor)
            .filter(|child| PARAMETER_KINDS.contains(&child.kind()))
            .collect();

        // `f(void)` declares no parameters
        if let [only] = params.as_slice() {
            let is_void = only.child_by_field_name("declarator").is_none()
                && only
                    .child_by_field_name("type")
                    .is_some_and(|ty| self.text(&ty) == "void");
            if is_void {
                return Vec::new();
            }
        }
        params
    }

    /// Callee spelling of a call expression
    ///
    /// The bare name for plain, qualified, templated and member calls; any
    /// other callee shape (lambdas, function pointers) is spelled in full.
    pub fn callee_spelling(&self, callee: &Node) -> String {
        match callee.kind() {
            "identifier" | "qualified_identifier" | "template_function" => {
                self.spelling(&bare_name(*callee))
            }
            "field_expression" => match callee.child_by_field_name("field") {
                Some(field) => self.spelling(&bare_name(field)),
                None => self.spelling(callee),
            },
            _ => self.spelling(callee),
        }
    }
}
