//! Hook extraction
//!
//! This module finds hook calls in parsed PHP files:
//! - [`HookVisitor`] walks a syntax tree and pairs every hook call with
//!   its doc comment
//! - [`resolve_hook_name`] recovers a hook's name from its first argument

pub mod name;
pub mod visitor;

pub use name::resolve_hook_name;
pub use visitor::{HookVisitor, TraversalState};

use crate::docblock::DocBlock;
use serde::{Deserialize, Serialize};

/// Kind of hook, decided by the function used to invoke it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookKind {
    Action,
    Filter,
}

impl HookKind {
    /// Map a called function name to the hook kind it invokes
    pub fn from_function(name: &str) -> Option<Self> {
        match name {
            "apply_filters" | "apply_filters_ref_array" | "apply_filters_deprecated" => {
                Some(HookKind::Filter)
            }
            "do_action" | "do_action_ref_array" | "do_action_deprecated" => Some(HookKind::Action),
            _ => None,
        }
    }
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookKind::Action => write!(f, "action"),
            HookKind::Filter => write!(f, "filter"),
        }
    }
}

/// Where a hook call appears
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub path: String,
    pub line: usize,
    pub end_line: usize,
}

impl SourceLocation {
    pub fn new(path: &str, line: usize, end_line: usize) -> Self {
        Self {
            path: path.to_string(),
            line,
            end_line: end_line.max(line),
        }
    }
}

/// A documented hook call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookDescriptor {
    pub name: String,
    pub kind: HookKind,
    /// Number of values passed to the hook (the name argument excluded)
    pub num_args: usize,
    pub location: SourceLocation,
    pub doc: DocBlock,
}
