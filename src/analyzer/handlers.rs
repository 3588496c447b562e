//! Per-kind record builders
//!
//! Each handler turns one classified node into one record. Handlers never
//! fail: a missing sub-node leaves the matching field empty or absent.

use tree_sitter::Node;

use super::node::{self, NodeReader};
use super::types::{
    CallExpression, FunctionDeclaration, IdentifierReference, Parameter, VariableDeclaration,
};

/// Build a record for a `function_definition` or a function declarator
pub(crate) fn function_declaration(reader: &NodeReader, node: Node) -> FunctionDeclaration {
    let (owner, declarator, is_definition) = if node.kind() == "function_definition" {
        (node, node.child_by_field_name("declarator"), true)
    } else {
        (node.parent().unwrap_or(node), Some(node), false)
    };

    let function_declarator = declarator.and_then(node::function_declarator);
    let name_node = node::function_name(node).map(node::bare_name);

    let parameters = function_declarator
        .map(|fd| {
            reader
                .parameters(fd)
                .into_iter()
                .map(|param| parameter(reader, param))
                .collect()
        })
        .unwrap_or_default();

    FunctionDeclaration {
        name: name_node.map(|n| reader.spelling(&n)).unwrap_or_default(),
        return_type: reader.return_type(&owner, declarator, function_declarator),
        is_definition,
        parameters,
        location: reader.location(&name_node.unwrap_or(node)),
    }
}

fn parameter(reader: &NodeReader, param: Node) -> Parameter {
    let declarator = param.child_by_field_name("declarator");
    let name_node = declarator.and_then(node::declarator_name);

    Parameter {
        name: name_node
            .map(|n| reader.spelling(&node::bare_name(n)))
            .unwrap_or_default(),
        type_name: reader.declared_type(&param, declarator, name_node),
    }
}

/// Build a record for a `call_expression`
pub(crate) fn call_expression(reader: &NodeReader, node: Node) -> CallExpression {
    let function_name = node
        .child_by_field_name("function")
        .map(|callee| reader.callee_spelling(&callee))
        .unwrap_or_default();

    let arguments = (0..)
        .map_while(|index| node::call_argument(node, index))
        .map(|arg| reader.spelling(&arg))
        .collect();

    CallExpression {
        function_name,
        arguments,
        location: reader.location(&node),
    }
}

/// Build a record for one variable declarator
pub(crate) fn variable_declaration(reader: &NodeReader, node: Node) -> VariableDeclaration {
    let owner = node.parent().unwrap_or(node);
    let declarator = if node.kind() == "init_declarator" {
        node.child_by_field_name("declarator")
    } else {
        Some(node)
    };
    let name_node = declarator.and_then(node::declarator_name);

    let name = match (name_node, declarator) {
        (Some(name), _) => reader.spelling(&node::bare_name(name)),
        // Structured bindings have no single name; keep the bracketed list
        (None, Some(declarator)) => reader.spelling(&declarator),
        (None, None) => String::new(),
    };

    VariableDeclaration {
        name,
        type_name: reader.declared_type(&owner, declarator, name_node),
        init_value: node::initializer(node, owner).map(|init| reader.initializer_spelling(&init)),
        location: reader.location(&name_node.unwrap_or(node)),
    }
}

/// Build a record for an identifier used in an expression
pub(crate) fn identifier_reference(reader: &NodeReader, node: Node) -> IdentifierReference {
    IdentifierReference {
        name: reader.spelling(&node),
        location: reader.location(&node),
    }
}
