//! Concrete to abstract tree conversion
//!
//! Malformed imports, assignments and inheritance headers are reported and the
//! offending node is dropped so its siblings still convert.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::ast::{AbstractNode, AtomNode, ImportNode, ObjectNode, PropertyNode, VariableAccessNode};
use super::error::{Diagnostics, ErrorCode, Location};
use super::parser::{ConcreteNode, ConcreteNodeKind};

/// Converted script
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ast {
    /// Top-level nodes in document order
    pub nodes: Vec<AbstractNode>,
    /// Variables assigned at top level
    pub variables: BTreeMap<String, String>,
}

fn node_location(node: &ConcreteNode) -> Location {
    Location::new(Arc::clone(&node.file), node.line)
}

fn strip_sigil(name: &str) -> &str {
    name.strip_prefix('$').unwrap_or(name)
}

/// Convert a concrete tree
pub fn build(nodes: Vec<ConcreteNode>, diagnostics: &mut Diagnostics) -> Ast {
    let mut variables = BTreeMap::new();
    let mut converted = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node.kind {
            ConcreteNodeKind::Import => {
                if let Some(import) = convert_import(node, diagnostics) {
                    converted.push(AbstractNode::Import(import));
                }
            }
            ConcreteNodeKind::VariableAssign => convert_assignment(node, &mut variables, diagnostics),
            _ => match convert_statement(node, diagnostics) {
                Some(statement @ AbstractNode::Object(_)) => converted.push(statement),
                Some(other) => diagnostics.error(
                    ErrorCode::UnexpectedToken,
                    other.location(),
                    format!("'{}' is not allowed at top level", other.text()),
                ),
                None => {}
            },
        }
    }
    Ast {
        nodes: converted,
        variables,
    }
}

/// Convert a flat value list, such as a re-parsed variable value
pub fn build_values(nodes: Vec<ConcreteNode>) -> Vec<AbstractNode> {
    nodes.into_iter().filter_map(convert_value).collect()
}

fn convert_value(node: ConcreteNode) -> Option<AbstractNode> {
    let location = node_location(&node);
    match node.kind {
        ConcreteNodeKind::Word => Some(AbstractNode::Atom(AtomNode::new(node.token, false, location))),
        ConcreteNodeKind::Quote => Some(AbstractNode::Atom(AtomNode::new(node.token, true, location))),
        ConcreteNodeKind::Variable => Some(AbstractNode::VariableAccess(VariableAccessNode {
            name: strip_sigil(&node.token).to_string(),
            location,
        })),
        _ => None,
    }
}

fn is_string(node: &ConcreteNode) -> bool {
    matches!(node.kind, ConcreteNodeKind::Word | ConcreteNodeKind::Quote)
}

fn convert_import(node: ConcreteNode, diagnostics: &mut Diagnostics) -> Option<ImportNode> {
    let location = node_location(&node);
    let mut operands: Vec<ConcreteNode> = node.children;
    if operands.len() == 3 && operands[1].kind == ConcreteNodeKind::Word && operands[1].token == "from" {
        operands.remove(1);
    }

    match operands.len() {
        0 | 1 => {
            diagnostics.error(
                ErrorCode::FewerParametersExpected,
                &location,
                "import requires a target and a source",
            );
            None
        }
        2 if operands.iter().all(is_string) => {
            let source = operands.pop()?.token;
            let target = operands.pop()?.token;
            Some(ImportNode {
                target,
                source,
                location,
            })
        }
        2 => {
            diagnostics.error(ErrorCode::StringExpected, &location, "import target and source must be strings");
            None
        }
        _ => {
            diagnostics.error(ErrorCode::InvalidParameters, &location, "malformed import statement");
            None
        }
    }
}

/// Script spelling of an assigned value, re-parsed when the variable is used
fn value_text(nodes: &[ConcreteNode]) -> String {
    nodes
        .iter()
        .map(|node| match node.kind {
            ConcreteNodeKind::Quote => {
                format!("\"{}\"", node.token.replace('\\', "\\\\").replace('"', "\\\""))
            }
            _ => node.token.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn convert_assignment(node: ConcreteNode, env: &mut BTreeMap<String, String>, diagnostics: &mut Diagnostics) {
    let location = node_location(&node);
    let Some((variable, values)) = node.children.split_first() else {
        diagnostics.error(ErrorCode::VariableExpected, &location, "assignment requires a variable");
        return;
    };
    if variable.kind != ConcreteNodeKind::Variable {
        diagnostics.error(
            ErrorCode::VariableExpected,
            &location,
            format!("'{}' is not a variable", variable.token),
        );
        return;
    }
    if values.is_empty() {
        diagnostics.error(
            ErrorCode::FewerParametersExpected,
            &location,
            format!("variable '{}' has no value", variable.token),
        );
        return;
    }
    if let Some(bad) = values.iter().find(|v| v.kind == ConcreteNodeKind::Colon) {
        diagnostics.error(ErrorCode::UnexpectedToken, &node_location(bad), "':' in variable value");
        return;
    }
    env.insert(strip_sigil(&variable.token).to_string(), value_text(values));
}

fn convert_statement(node: ConcreteNode, diagnostics: &mut Diagnostics) -> Option<AbstractNode> {
    if node.kind == ConcreteNodeKind::Variable {
        return convert_value(node);
    }
    if node.is_object() {
        return convert_object(node, diagnostics).map(AbstractNode::Object);
    }
    if node.children.is_empty() {
        return convert_value(node);
    }

    let location = node_location(&node);
    let mut property = PropertyNode::new(node.token, location);
    for child in node.children {
        if child.kind == ConcreteNodeKind::Colon {
            diagnostics.error(
                ErrorCode::UnexpectedToken,
                &property.location,
                format!("':' in property '{}'", property.name),
            );
            return None;
        }
        property.values.extend(convert_value(child));
    }
    Some(AbstractNode::Property(property))
}

fn convert_block(
    nodes: Vec<ConcreteNode>,
    env: &mut BTreeMap<String, String>,
    diagnostics: &mut Diagnostics,
) -> Vec<AbstractNode> {
    let mut children = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node.kind {
            ConcreteNodeKind::VariableAssign => convert_assignment(node, env, diagnostics),
            ConcreteNodeKind::Import => {
                diagnostics.error(
                    ErrorCode::UnexpectedToken,
                    &node_location(&node),
                    "import is only allowed at top level",
                );
            }
            _ => children.extend(convert_statement(node, diagnostics)),
        }
    }
    children
}

fn convert_object(node: ConcreteNode, diagnostics: &mut Diagnostics) -> Option<ObjectNode> {
    let location = node_location(&node);
    let mut header = node.children;
    let _close = header.pop();
    let body = header.pop().map(|open| open.children).unwrap_or_default();

    let (cls, is_abstract) = if node.token == "abstract" && node.kind == ConcreteNodeKind::Word {
        if header.first().is_some_and(is_string) {
            (header.remove(0).token, true)
        } else {
            diagnostics.error(ErrorCode::ObjectNameExpected, &location, "abstract requires an object class");
            return None;
        }
    } else {
        (node.token, false)
    };

    let mut object = ObjectNode::new(cls, location);
    object.is_abstract = is_abstract;

    let colon = header.iter().position(|n| n.kind == ConcreteNodeKind::Colon);
    let inherit = colon.map(|at| header.split_off(at));
    let mut header = header.into_iter();

    if let Some(first) = header.next() {
        if is_string(&first) {
            object.name = first.token;
        } else {
            object.values.extend(convert_value(first));
        }
    }
    object.values.extend(header.filter_map(convert_value));

    if let Some(inherit) = inherit {
        match inherit.as_slice() {
            [_, base] if is_string(base) => object.base = Some(base.token.clone()),
            [colon] => {
                diagnostics.error(
                    ErrorCode::ObjectNameExpected,
                    &node_location(colon),
                    format!("inheritance target expected for '{}'", object.cls),
                );
                return None;
            }
            [colon, ..] => {
                diagnostics.error(
                    ErrorCode::StringExpected,
                    &node_location(colon),
                    format!("inheritance target of '{}' must be a single string", object.cls),
                );
                return None;
            }
            [] => {}
        }
    }

    let mut env = BTreeMap::new();
    object.children = convert_block(body, &mut env, diagnostics);
    object.env = env;
    Some(object)
}
