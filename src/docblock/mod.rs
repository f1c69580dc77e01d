//! PHPDoc comment model
//!
//! A [`DocBlockParser`] turns a raw `/** ... */` comment into a
//! [`DocBlock`]: a one-sentence summary, a free-form description and the
//! ordered list of `@tags`. Tags are classified into a closed set of
//! [`TagKind`]s; anything the parser does not recognize is kept as a
//! generic tag, and anything it cannot make sense of as an invalid one.

mod parser;
mod types;

pub use parser::PhpDocParser;
pub use types::parse_types;

use serde::{Deserialize, Serialize};

/// Structured documentation parsed from one comment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocBlock {
    /// Short summary, up to the first sentence-ending period or blank line
    pub summary: String,
    /// Long description following the summary
    pub description: String,
    /// Tags in source order
    pub tags: Vec<DocTag>,
}

impl DocBlock {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Self::default()
        }
    }
}

/// Classification of a tag by the shape of its body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    /// `@param type $name description`
    Param,
    /// `@return type description`
    Return,
    /// `@var type [$name] description`
    Var,
    /// `@throws type description`
    Throws,
    /// `@property`, `@property-read`, `@property-write`
    Property,
    /// `@link uri description`
    Link,
    /// `@see reference description`
    See,
    /// `@uses reference description`
    Uses,
    /// `@since version description`
    Since,
    /// `@version version description`
    Version,
    /// `@deprecated [version] description`
    Deprecated,
    /// Any other well-formed tag; its whole body is the description
    Generic,
    /// A tag whose body does not fit its kind (e.g. `@since MU (3.0.0)`)
    Invalid,
}

impl TagKind {
    /// Pick the kind for a tag name
    pub fn from_name(name: &str) -> Self {
        match name {
            "param" => TagKind::Param,
            "return" => TagKind::Return,
            "var" => TagKind::Var,
            "throws" => TagKind::Throws,
            "property" | "property-read" | "property-write" => TagKind::Property,
            "link" => TagKind::Link,
            "see" => TagKind::See,
            "uses" => TagKind::Uses,
            "since" => TagKind::Since,
            "version" => TagKind::Version,
            "deprecated" => TagKind::Deprecated,
            _ => TagKind::Generic,
        }
    }
}

/// One `@tag` annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTag {
    /// Tag name without the `@`
    pub name: String,
    pub kind: TagKind,
    /// Everything after the tag name, as written
    pub body: String,
    /// Free-text description part of the body
    pub description: String,
    pub types: Option<Vec<String>>,
    /// Variable name without the leading `$`
    pub variable: Option<String>,
    pub link: Option<String>,
    pub reference: Option<String>,
    pub version: Option<String>,
}

impl DocTag {
    /// A tag of the given kind with nothing but its raw body
    pub fn new(name: impl Into<String>, kind: TagKind, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            body: body.into(),
            description: String::new(),
            types: None,
            variable: None,
            link: None,
            reference: None,
            version: None,
        }
    }

    /// A tag that could not be parsed according to its kind
    pub fn invalid(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(name, TagKind::Invalid, body)
    }
}

/// Parses a raw doc comment into a [`DocBlock`]
pub trait DocBlockParser {
    fn parse(&self, comment: &str) -> DocBlock;
}
