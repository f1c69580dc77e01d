//! Tree-sitter backed PHP parser
//!
//! Converts a tree-sitter-php concrete syntax tree into the crate's
//! [`SyntaxTree`]. Two things happen on the way:
//! - doc comments are attached the way PHP's own parser does it: a
//!   `/** */` comment belongs to every node that starts at the first
//!   token after it
//! - call arguments are rendered back to normalized source text so hook
//!   names can be recovered from them

use super::{CallExpr, NodeKind, SyntaxError, SyntaxNode, SyntaxParser, SyntaxTree};
use std::collections::HashMap;
use tree_sitter::Node;

/// Node kinds that carry no meaning for hook extraction; their children
/// are hoisted into the parent.
const TRANSPARENT_KINDS: &[&str] = &[
    "comment",
    "php_tag",
    "text_interpolation",
    "name",
    "qualified_name",
    "namespace_name",
    "visibility_modifier",
    "static_modifier",
    "final_modifier",
    "abstract_modifier",
    "readonly_modifier",
    "var_modifier",
    "reference_modifier",
];

/// PHP parser backed by tree-sitter-php
pub struct PhpParser {
    parser: tree_sitter::Parser,
}

impl PhpParser {
    /// Create a new PHP parser
    pub fn new() -> Result<Self, SyntaxError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_php::LANGUAGE_PHP.into())
            .map_err(|e| SyntaxError::Language(e.to_string()))?;

        Ok(Self { parser })
    }
}

impl SyntaxParser for PhpParser {
    fn parse(&mut self, source: &str) -> Result<SyntaxTree, SyntaxError> {
        let tree = self.parser.parse(source, None).ok_or(SyntaxError::NoTree)?;
        let root = tree.root_node();

        if root.has_error() {
            return Err(SyntaxError::Invalid {
                line: first_error_line(root),
            });
        }

        let mut docs = HashMap::new();
        let mut pending = None;
        collect_doc_comments(root, source, &mut pending, &mut docs);

        let builder = TreeBuilder {
            source,
            docs: &docs,
        };

        Ok(SyntaxTree {
            nodes: builder.children(root),
        })
    }
}

/// Builds [`SyntaxNode`]s out of tree-sitter nodes
struct TreeBuilder<'a> {
    source: &'a str,
    /// Doc comment text keyed by the start byte of the token it precedes
    docs: &'a HashMap<usize, String>,
}

impl TreeBuilder<'_> {
    fn children(&self, node: Node) -> Vec<SyntaxNode> {
        let mut out = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.push(child, &mut out);
        }
        out
    }

    fn push(&self, node: Node, out: &mut Vec<SyntaxNode>) {
        if TRANSPARENT_KINDS.contains(&node.kind()) {
            out.extend(self.children(node));
            return;
        }

        let mut built = SyntaxNode::new(
            self.classify(node),
            node.start_position().row + 1,
            node.end_position().row + 1,
        );
        built.doc_comment = self.docs.get(&node.start_byte()).cloned();
        built.children = self.children(node);
        out.push(built);
    }

    fn classify(&self, node: Node) -> NodeKind {
        match node.kind() {
            "class_declaration" | "interface_declaration" | "trait_declaration"
            | "enum_declaration" => NodeKind::TypeDeclaration,
            "method_declaration" | "property_declaration" | "property_element" | "enum_case" => {
                NodeKind::ClassMember
            }
            "const_declaration" => {
                let in_class_body = node
                    .parent()
                    .is_some_and(|p| p.kind().ends_with("declaration_list"));
                if in_class_body {
                    NodeKind::ClassMember
                } else {
                    NodeKind::Constant
                }
            }
            "function_definition" => NodeKind::Function,
            "expression_statement" if is_include_statement(node) => NodeKind::Include,
            "function_call_expression" => NodeKind::Call(self.call(node)),
            _ => NodeKind::Other,
        }
    }

    fn call(&self, node: Node) -> CallExpr {
        let callee = node
            .child_by_field_name("function")
            .filter(|f| matches!(f.kind(), "name" | "qualified_name"))
            .map(|f| self.text(f).trim_start_matches('\\').to_string());

        let mut args = Vec::new();
        if let Some(arguments) = node.child_by_field_name("arguments") {
            let mut cursor = arguments.walk();
            for argument in arguments.named_children(&mut cursor) {
                if argument.kind() != "argument" {
                    continue;
                }
                args.push(self.render_argument(argument));
            }
        }

        CallExpr { callee, args }
    }

    /// Render an expression back to normalized source text.
    ///
    /// Calls, member accesses and subscripts are printed without padding
    /// inside `()` and `[]`, so `$this->get( 'a' )` becomes
    /// `$this->get('a')`.
    fn render(&self, node: Node) -> String {
        match node.kind() {
            "string" => self.text(node).to_string(),
            "encapsed_string" => self.render_interpolated(node),
            "function_call_expression" => match (
                node.child_by_field_name("function"),
                node.child_by_field_name("arguments"),
            ) {
                (Some(function), Some(arguments)) => {
                    format!("{}{}", self.render(function), self.render(arguments))
                }
                _ => collapse_whitespace(self.text(node)),
            },
            "member_call_expression" => self.render_member(node, "->", "object", true),
            "nullsafe_member_call_expression" => self.render_member(node, "?->", "object", true),
            "scoped_call_expression" => self.render_member(node, "::", "scope", true),
            "member_access_expression" => self.render_member(node, "->", "object", false),
            "nullsafe_member_access_expression" => {
                self.render_member(node, "?->", "object", false)
            }
            "scoped_property_access_expression" => self.render_member(node, "::", "scope", false),
            "subscript_expression" => {
                let mut cursor = node.walk();
                let parts: Vec<Node> = node.named_children(&mut cursor).collect();
                match parts.as_slice() {
                    [base] => format!("{}[]", self.render(*base)),
                    [base, index] => format!("{}[{}]", self.render(*base), self.render(*index)),
                    _ => collapse_whitespace(self.text(node)),
                }
            }
            "arguments" => {
                let mut cursor = node.walk();
                let args: Vec<String> = node
                    .named_children(&mut cursor)
                    .filter(|child| child.kind() != "comment")
                    .map(|child| match child.kind() {
                        "argument" => self.render_argument(child),
                        _ => collapse_whitespace(self.text(child)),
                    })
                    .collect();
                format!("({})", args.join(", "))
            }
            "parenthesized_expression" => match node.named_child(0) {
                Some(inner) => format!("({})", self.render(inner)),
                None => collapse_whitespace(self.text(node)),
            },
            "binary_expression" => {
                let parts = (
                    node.child_by_field_name("left"),
                    node.child_by_field_name("operator"),
                    node.child_by_field_name("right"),
                );
                match parts {
                    (Some(left), Some(op), Some(right)) => format!(
                        "{} {} {}",
                        self.render(left),
                        self.text(op),
                        self.render(right)
                    ),
                    _ => collapse_whitespace(self.text(node)),
                }
            }
            _ => collapse_whitespace(self.text(node)),
        }
    }

    /// `object->name(args)`, `Scope::name`, and the like
    fn render_member(&self, node: Node, operator: &str, base: &str, call: bool) -> String {
        let parts = (
            node.child_by_field_name(base),
            node.child_by_field_name("name"),
        );
        let (Some(base), Some(name)) = parts else {
            return collapse_whitespace(self.text(node));
        };

        let mut out = format!("{}{}{}", self.render(base), operator, self.render(name));
        if call {
            match node.child_by_field_name("arguments") {
                Some(arguments) => out.push_str(&self.render(arguments)),
                None => return collapse_whitespace(self.text(node)),
            }
        }
        out
    }

    /// One call argument: `value`, `name: value` or `...$values`
    fn render_argument(&self, argument: Node) -> String {
        let mut cursor = argument.walk();
        let Some(value) = argument.named_children(&mut cursor).last() else {
            return collapse_whitespace(self.text(argument));
        };

        let rendered = self.render(value);
        match argument.child_by_field_name("name") {
            Some(name) if name.id() != value.id() => format!("{}: {}", self.text(name), rendered),
            _ => rendered,
        }
    }

    /// Render a double-quoted string, wrapping each interpolated part in
    /// braces (`"a_$id"` becomes `"a_{$id}"`).
    fn render_interpolated(&self, node: Node) -> String {
        let mut out = String::new();
        let mut braced = false;
        let mut last_end = node.start_byte();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            out.push_str(&self.source[last_end..child.start_byte()]);
            last_end = child.end_byte();

            match child.kind() {
                "string_content" | "string_value" | "escape_sequence" => {
                    out.push_str(self.text(child));
                }
                "{" => {
                    braced = true;
                    out.push('{');
                }
                "}" => {
                    braced = false;
                    out.push('}');
                }
                _ if child.is_named() && braced => out.push_str(&self.render(child)),
                _ if child.is_named() => {
                    out.push('{');
                    out.push_str(&self.render(child));
                    out.push('}');
                }
                _ => out.push_str(self.text(child)),
            }
        }
        out.push_str(&self.source[last_end..node.end_byte()]);

        out
    }

    fn text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

/// Record, for every token preceded by doc comments, the last of those
/// comments.
fn collect_doc_comments(
    node: Node,
    source: &str,
    pending: &mut Option<String>,
    docs: &mut HashMap<usize, String>,
) {
    if node.kind() == "comment" {
        let text = node.utf8_text(source.as_bytes()).unwrap_or("");
        if text.starts_with("/**") {
            *pending = Some(text.to_string());
        }
        return;
    }

    if node.child_count() == 0 {
        if let Some(doc) = pending.take() {
            docs.insert(node.start_byte(), doc);
        }
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_doc_comments(child, source, pending, docs);
    }
}

fn is_include_statement(node: Node) -> bool {
    node.named_child(0).is_some_and(|expr| {
        matches!(
            expr.kind(),
            "include_expression"
                | "include_once_expression"
                | "require_expression"
                | "require_once_expression"
        )
    })
}

fn first_error_line(node: Node) -> usize {
    if node.is_error() || node.is_missing() {
        return node.start_position().row + 1;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            return first_error_line(child);
        }
    }

    node.start_position().row + 1
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
