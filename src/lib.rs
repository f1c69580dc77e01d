//! hookdoc - WordPress hook documentation extractor
//!
//! This library finds calls to `do_action`, `apply_filters` and their
//! variants in PHP source, pairs each call with its doc comment and exports
//! the result as structured, formatted JSON.

pub mod cli;
pub mod docblock;
pub mod error;
pub mod export;
pub mod extract;
pub mod pipeline;
pub mod source;
pub mod syntax;

/// Re-export commonly used types
pub use docblock::{DocBlock, DocBlockParser, DocTag, PhpDocParser, TagKind};
pub use error::HookdocError;
pub use export::{DefaultFormatter, DocFormatter, ExportedHook, Exporter};
pub use extract::{HookDescriptor, HookKind, HookVisitor, SourceLocation};
pub use pipeline::{HookDocument, Pipeline, RunSummary};
pub use source::{ScanConfig, SourceLocator};
pub use syntax::{PhpParser, SyntaxParser, SyntaxTree};

/// Application-wide error type
pub use anyhow::Result;
