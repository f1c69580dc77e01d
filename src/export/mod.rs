//! Hook export
//!
//! Projects [`HookDescriptor`]s into the JSON records written to the
//! output file. Doc text goes through a [`DocFormatter`] on the way out.

pub mod format;

pub use format::{DefaultFormatter, DocFormatter};

use crate::docblock::{DocTag, TagKind};
use crate::extract::{HookDescriptor, HookKind};
use crate::source::normalize_path_slashes;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One hook as written to the output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedHook {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: HookKind,
    pub num_args: usize,
    pub path: String,
    pub line: usize,
    /// Omitted when the call fits on one line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    pub doc: ExportedDoc,
}

/// Formatted documentation of a hook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedDoc {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<ExportedTag>,
}

/// Formatted doc tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedTag {
    pub name: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Set for version tags, whose content is the version itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExportedTag {
    fn new(name: &str, content: String) -> Self {
        Self {
            name: name.to_string(),
            content,
            types: None,
            link: None,
            variable: None,
            reference: None,
            description: None,
        }
    }
}

/// Turns hook descriptors into exported records
pub struct Exporter<F: DocFormatter = DefaultFormatter> {
    formatter: F,
    /// Normalized root directory without a trailing slash
    root: Option<String>,
}

impl<F: DocFormatter> Exporter<F> {
    /// Create an exporter; paths under `root` are exported relative to it
    pub fn new(formatter: F, root: Option<&Path>) -> Self {
        let root = root.map(|root| {
            normalize_path_slashes(&root.to_string_lossy())
                .trim_end_matches('/')
                .to_string()
        });

        Self { formatter, root }
    }

    /// Export one hook
    pub fn export_hook(&self, hook: &HookDescriptor) -> ExportedHook {
        let location = &hook.location;
        let doc = &hook.doc;

        let description = self.formatter.format_long_description(&doc.description);

        ExportedHook {
            name: hook.name.clone(),
            kind: hook.kind,
            num_args: hook.num_args,
            path: self.export_path(&location.path),
            line: location.line,
            end_line: (location.end_line != location.line).then_some(location.end_line),
            doc: ExportedDoc {
                summary: self.formatter.format_summary(&doc.summary),
                description: (!description.is_empty()).then_some(description),
                tags: doc.tags.iter().map(|tag| self.export_tag(tag)).collect(),
            },
        }
    }

    /// Export one tag according to its kind
    pub fn export_tag(&self, tag: &DocTag) -> ExportedTag {
        let description = if tag.description.is_empty() {
            String::new()
        } else {
            self.formatter.format_tag_description(&tag.description)
        };

        let mut exported = ExportedTag::new(&tag.name, description.clone());

        match tag.kind {
            TagKind::Param => {
                exported.types = tag.types.clone();
                exported.variable = tag.variable.clone();
            }
            TagKind::Return | TagKind::Var | TagKind::Throws | TagKind::Property => {
                exported.types = tag.types.clone();
            }
            TagKind::Link => exported.link = tag.link.clone(),
            TagKind::See | TagKind::Uses => exported.reference = tag.reference.clone(),
            TagKind::Since | TagKind::Version | TagKind::Deprecated => {
                exported.content = tag.version.clone().unwrap_or_default();
                if !description.is_empty() {
                    exported.description = Some(description);
                }
            }
            TagKind::Generic => {}
            TagKind::Invalid => {
                if exported.content.is_empty() {
                    exported.content = tag.body.clone();
                }
            }
        }

        exported
    }

    fn export_path(&self, path: &str) -> String {
        let Some(root) = &self.root else {
            return path.to_string();
        };

        let path = normalize_path_slashes(path);
        match path.strip_prefix(root.as_str()) {
            Some(relative) => relative.to_string(),
            None => path,
        }
    }
}
