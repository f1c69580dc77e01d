//! PHP syntax trees as seen by the hook extractor
//!
//! The extractor never touches tree-sitter directly. A [`SyntaxParser`]
//! turns source text into a [`SyntaxTree`] made of [`SyntaxNode`]s that
//! carry only what hook detection needs:
//! - a closed [`NodeKind`]
//! - the doc comment attached to the node, if any
//! - the node's line span
//! - callee and rendered arguments for function calls

mod php;

pub use php::PhpParser;

use thiserror::Error;

/// A parsed source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    /// Top-level nodes in source order
    pub nodes: Vec<SyntaxNode>,
}

/// One node of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Raw `/** ... */` comment attached to the node
    pub doc_comment: Option<String>,
    /// 1-based line where the node starts
    pub start_line: usize,
    /// 1-based line where the node ends
    pub end_line: usize,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Create a node without doc comment or children
    pub fn new(kind: NodeKind, start_line: usize, end_line: usize) -> Self {
        Self {
            kind,
            doc_comment: None,
            start_line,
            end_line: end_line.max(start_line),
            children: Vec::new(),
        }
    }

    /// Attach a raw doc comment
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc_comment = Some(doc.into());
        self
    }

    /// Append child nodes
    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    /// The call expression, if this node is a function call
    pub fn as_call(&self) -> Option<&CallExpr> {
        match &self.kind {
            NodeKind::Call(call) => Some(call),
            _ => None,
        }
    }
}

/// The node kinds the extractor distinguishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Class, interface, trait or enum declaration
    TypeDeclaration,
    /// Method, property, class constant or enum case
    ClassMember,
    /// Function declaration
    Function,
    /// Top-level `const` declaration
    Constant,
    /// Statement consisting of an include/require expression
    Include,
    /// Function call
    Call(CallExpr),
    /// Anything else
    Other,
}

/// A function call expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr {
    /// Called function name; `None` when the callee is not a plain name
    /// (e.g. `$callback(...)`)
    pub callee: Option<String>,
    /// Arguments, each rendered back to normalized source text
    pub args: Vec<String>,
}

impl CallExpr {
    pub fn new(callee: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            callee: Some(callee.into()),
            args,
        }
    }
}

/// Failure to turn source text into a tree
#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("parser could not be initialized: {0}")]
    Language(String),

    #[error("parser produced no tree")]
    NoTree,

    #[error("syntax error on line {line}")]
    Invalid { line: usize },
}

/// Parses one file's text into a [`SyntaxTree`]
pub trait SyntaxParser {
    fn parse(&mut self, source: &str) -> Result<SyntaxTree, SyntaxError>;
}
