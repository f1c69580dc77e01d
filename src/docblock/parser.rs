//! PHPDoc comment parser
//!
//! Follows phpDocumentor's reading of a doc comment:
//! - the comment markers and one space after each leading `*` are removed
//! - the summary runs until a line ending in a period or a blank line
//! - the description runs until the first line starting with `@`
//! - every line starting with `@` opens a new tag; other lines continue it

use super::{parse_types, DocBlock, DocBlockParser, DocTag, TagKind};
use regex::Regex;
use std::sync::LazyLock;

/// `@name` followed by whitespace, `(`, `{` or the end of the tag
static TAG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^@([\w\-\\:]+)(?:[\s({]\s*(.*)|$)").expect("valid tag pattern")
});

/// Release (`1.2.0`) or VCS (`SVN: $Id$`) version vector at the start of a body
static VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(\d\S*|[^\s:]+:\s*\$[^$]+\$)(?:\s*(.+))?$").expect("valid version pattern")
});

/// Parser for PHPDoc comments
#[derive(Debug, Clone, Copy, Default)]
pub struct PhpDocParser;

impl PhpDocParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocBlockParser for PhpDocParser {
    fn parse(&self, comment: &str) -> DocBlock {
        let text = strip_comment(comment);
        let lines: Vec<&str> = text.lines().collect();

        let tag_start = lines
            .iter()
            .position(|line| starts_tag(line.trim_start_matches([' ', '\t'])))
            .unwrap_or(lines.len());
        let (body, tag_lines) = lines.split_at(tag_start);

        let (summary, description) = split_body(body);

        DocBlock {
            summary,
            description,
            tags: group_tags(tag_lines).iter().map(|t| parse_tag(t)).collect(),
        }
    }
}

/// Remove comment markers and leading asterisks, normalize line endings
/// and drop trailing horizontal whitespace on every line.
fn strip_comment(comment: &str) -> String {
    let normalized = comment.replace("\r\n", "\n").replace('\r', "\n");

    let stripped: Vec<&str> = normalized
        .split('\n')
        .map(|line| strip_line(line).trim_end_matches([' ', '\t']))
        .collect();

    let text = stripped.join("\n");
    let text = text.trim();
    text.strip_suffix("*/").unwrap_or(text).trim().to_string()
}

fn strip_line(line: &str) -> &str {
    let line = line.trim_start_matches([' ', '\t']);
    let line = line
        .strip_prefix("/**")
        .or_else(|| line.strip_prefix("*/"))
        .or_else(|| line.strip_prefix('*'))
        .unwrap_or(line);
    line.strip_prefix([' ', '\t']).unwrap_or(line)
}

fn starts_tag(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next() == Some('@') && chars.next().is_some_and(char::is_alphabetic)
}

/// Split the untagged part of a comment into summary and description
fn split_body(body: &[&str]) -> (String, String) {
    let mut summary_end = body.len();
    for (i, line) in body.iter().enumerate() {
        if line.is_empty() {
            summary_end = i;
            break;
        }
        if line.ends_with('.') {
            summary_end = i + 1;
            break;
        }
    }

    let summary = body[..summary_end].join("\n");
    let description = body[summary_end..].join("\n").trim().to_string();

    (summary, description)
}

/// Join continuation lines onto the tag line they belong to
fn group_tags(lines: &[&str]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            tags.push(line.trim_start().to_string());
        } else if starts_tag(line) {
            tags.push((*line).to_string());
        } else if let Some(last) = tags.last_mut() {
            last.push('\n');
            last.push_str(line);
        }
    }

    for tag in &mut tags {
        let trimmed = tag.trim_end().len();
        tag.truncate(trimmed);
    }

    tags
}

fn parse_tag(line: &str) -> DocTag {
    let Some(caps) = TAG_LINE.captures(line) else {
        let (name, body) = split_word(line.trim_start_matches('@'));
        return DocTag::invalid(name, body);
    };

    let name = caps.get(1).map_or("", |m| m.as_str());
    let body = caps.get(2).map_or("", |m| m.as_str()).trim_end();

    match TagKind::from_name(name) {
        TagKind::Param => parse_param(name, body),
        TagKind::Var | TagKind::Property => parse_typed_variable(name, body),
        kind @ (TagKind::Return | TagKind::Throws) => parse_typed(name, kind, body),
        TagKind::Link => {
            let (link, description) = split_word(body);
            let mut tag = DocTag::new(name, TagKind::Link, body);
            tag.link = Some(link.to_string());
            tag.description = description.to_string();
            tag
        }
        kind @ (TagKind::See | TagKind::Uses) => {
            let (reference, description) = split_word(body);
            if reference.is_empty() {
                return DocTag::invalid(name, body);
            }
            let mut tag = DocTag::new(name, kind, body);
            tag.reference = Some(normalize_reference(reference));
            tag.description = description.to_string();
            tag
        }
        kind @ (TagKind::Since | TagKind::Version | TagKind::Deprecated) => {
            parse_versioned(name, kind, body)
        }
        TagKind::Generic | TagKind::Invalid => {
            let mut tag = DocTag::new(name, TagKind::Generic, body);
            tag.description = body.to_string();
            tag
        }
    }
}

/// `@param [type] [$variable] [description]`
fn parse_param(name: &str, body: &str) -> DocTag {
    let mut tag = DocTag::new(name, TagKind::Param, body);
    let mut rest = body;

    let (first, after) = split_type(rest);
    if !first.is_empty() && !is_variable(first) {
        tag.types = Some(parse_types(first));
        rest = after;
    }

    let (word, after) = split_word(rest);
    if is_variable(word) {
        tag.variable = Some(variable_name(word));
        rest = after;
    }

    tag.description = rest.to_string();
    tag
}

/// `@var type [$variable] [description]` and the `@property` family
fn parse_typed_variable(name: &str, body: &str) -> DocTag {
    let kind = TagKind::from_name(name);
    let (ty, rest) = split_type(body);
    if ty.is_empty() {
        return DocTag::invalid(name, body);
    }

    let mut tag = DocTag::new(name, kind, body);
    tag.types = Some(parse_types(ty));

    let (word, after) = split_word(rest);
    if is_variable(word) {
        tag.variable = Some(variable_name(word));
        tag.description = after.to_string();
    } else {
        tag.description = rest.to_string();
    }

    tag
}

/// `@return type [description]`, `@throws type [description]`
fn parse_typed(name: &str, kind: TagKind, body: &str) -> DocTag {
    let (ty, rest) = split_type(body);
    if ty.is_empty() {
        return DocTag::invalid(name, body);
    }

    let mut tag = DocTag::new(name, kind, body);
    tag.types = Some(parse_types(ty));
    tag.description = rest.to_string();
    tag
}

/// `@since`, `@version`, `@deprecated`
fn parse_versioned(name: &str, kind: TagKind, body: &str) -> DocTag {
    let mut tag = DocTag::new(name, kind, body);
    if body.is_empty() {
        return tag;
    }

    match VERSION.captures(body) {
        Some(caps) => {
            tag.version = caps.get(1).map(|m| m.as_str().to_string());
            tag.description = caps.get(2).map_or("", |m| m.as_str()).to_string();
        }
        // A deprecation notice does not need a version
        None if kind == TagKind::Deprecated => tag.description = body.to_string(),
        None => return DocTag::invalid(name, body),
    }

    tag
}

/// Split off a type expression, respecting brackets so that
/// `array<string, int>` stays in one piece.
fn split_type(text: &str) -> (&str, &str) {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '{' | '[' => depth += 1,
            '>' | ')' | '}' | ']' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                return (&text[..i], text[i..].trim_start());
            }
            _ => {}
        }
    }
    (text, "")
}

/// Split off the first whitespace-delimited word, keeping the remainder's
/// inner line breaks intact.
fn split_word(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], text[i..].trim_start()),
        None => (text, ""),
    }
}

fn is_variable(word: &str) -> bool {
    let word = word.trim_start_matches('&').trim_start_matches("...");
    word.starts_with('$') && word.len() > 1
}

fn variable_name(word: &str) -> String {
    word.trim_start_matches('&')
        .trim_start_matches("...")
        .trim_start_matches('$')
        .to_string()
}

/// URLs are kept as written; structural element names are made fully
/// qualified (`get_post()` → `\get_post()`).
fn normalize_reference(reference: &str) -> String {
    if reference.contains("://") || reference.starts_with('\\') {
        reference.to_string()
    } else if reference.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        format!("\\{}", reference)
    } else {
        reference.to_string()
    }
}
