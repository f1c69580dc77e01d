//! Hook call detection and doc comment association
//!
//! Doc comments in WordPress-style code sit directly above the hook call,
//! but when the call is nested in an expression (`$title =
//! apply_filters(...)`, `return apply_filters(...)`) the comment ends up
//! attached to the enclosing statement instead. The visitor remembers the
//! last such "orphaned" comment and hands it to the next hook call that
//! has no comment of its own.
//!
//! The walk is a fold: [`TraversalState`] is passed into every
//! [`HookVisitor::enter`] / [`HookVisitor::leave`] step and returned from it.

use super::{resolve_hook_name, HookDescriptor, HookKind, SourceLocation};
use crate::docblock::DocBlockParser;
use crate::syntax::{CallExpr, NodeKind, SyntaxNode, SyntaxTree};
use regex::Regex;
use std::sync::LazyLock;

/// Summary used for hooks whose documentation lives at another call site
static REUSED_HOOK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"This (?:action|filter) is documented in").expect("valid summary pattern")
});

/// State threaded through the walk of one file
#[derive(Debug, Clone, Default)]
pub struct TraversalState {
    /// Last doc comment found on a node that is not normally documented
    pub pending_orphan: Option<String>,
    /// Hooks found so far, in source order
    pub hooks: Vec<HookDescriptor>,
}

/// Finds documented hook calls in a syntax tree
pub struct HookVisitor<'a> {
    doc_parser: &'a dyn DocBlockParser,
    ignore_reused_hooks: bool,
}

impl<'a> HookVisitor<'a> {
    /// Create a visitor; reused-hook suppression is on by default
    pub fn new(doc_parser: &'a dyn DocBlockParser) -> Self {
        Self {
            doc_parser,
            ignore_reused_hooks: true,
        }
    }

    /// Skip hooks whose summary says they are documented elsewhere
    pub fn with_ignore_reused_hooks(mut self, ignore: bool) -> Self {
        self.ignore_reused_hooks = ignore;
        self
    }

    /// Extract all documented hooks from one file's tree
    pub fn extract(&self, tree: &SyntaxTree, path: &str) -> Vec<HookDescriptor> {
        tree.nodes
            .iter()
            .fold(TraversalState::default(), |state, node| {
                self.visit(node, path, state)
            })
            .hooks
    }

    fn visit(&self, node: &SyntaxNode, path: &str, state: TraversalState) -> TraversalState {
        let state = self.enter(node, state);
        let state = node
            .children
            .iter()
            .fold(state, |state, child| self.visit(child, path, state));
        self.leave(node, path, state)
    }

    /// Pre-order step: track doc comments that nothing else will claim
    pub fn enter(&self, node: &SyntaxNode, mut state: TraversalState) -> TraversalState {
        if let Some(doc) = &node.doc_comment {
            if can_be_documented(node) || hook_call(node).is_some() {
                state.pending_orphan = None;
            } else {
                state.pending_orphan = Some(doc.clone());
            }
        }
        state
    }

    /// Post-order step: record a hook call if it is documented
    pub fn leave(
        &self,
        node: &SyntaxNode,
        path: &str,
        mut state: TraversalState,
    ) -> TraversalState {
        let Some((kind, call)) = hook_call(node) else {
            return state;
        };

        let comment = match &node.doc_comment {
            Some(doc) => doc.clone(),
            None => match state.pending_orphan.take() {
                Some(doc) => doc,
                None => return state,
            },
        };

        let doc = self.doc_parser.parse(&comment);
        if self.ignore_reused_hooks && REUSED_HOOK.is_match(&doc.summary) {
            return state;
        }

        state.hooks.push(HookDescriptor {
            name: resolve_hook_name(call.args.first().map(String::as_str)),
            kind,
            num_args: call.args.len().saturating_sub(1),
            location: SourceLocation::new(path, node.start_line, node.end_line),
            doc,
        });

        state
    }
}

/// Whether doc tooling documents this kind of node on its own
fn can_be_documented(node: &SyntaxNode) -> bool {
    match &node.kind {
        NodeKind::TypeDeclaration
        | NodeKind::ClassMember
        | NodeKind::Function
        | NodeKind::Constant
        | NodeKind::Include => true,
        NodeKind::Call(call) => call.callee.as_deref() == Some("define"),
        NodeKind::Other => false,
    }
}

fn hook_call(node: &SyntaxNode) -> Option<(HookKind, &CallExpr)> {
    let call = node.as_call()?;
    let kind = HookKind::from_function(call.callee.as_deref()?)?;
    Some((kind, call))
}
