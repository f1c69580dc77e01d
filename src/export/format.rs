//! Doc text normalization
//!
//! Doc comments are hand-wrapped to a fixed width and written in loose
//! Markdown. The formatter renders them to HTML and unwraps the manual
//! line breaks, leaving code blocks untouched.

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n\r]+").expect("valid newline pattern"));

static CODE_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<code>(.*?)</code>").expect("valid code pattern"));

/// Stands in for newlines inside code blocks while the text is unwrapped
const PLACEHOLDER: &str = "{{{{{}}}}}";

/// Stands in for newlines while a tag description is rendered, so that
/// Markdown sees a single line and only applies inline formatting
const LINE_SENTINEL: char = '\u{E000}';

const CODE_OPEN: &str = "<pre><code>";
const CODE_CLOSE: &str = "</code></pre>";

/// Turns raw doc text into its exported form
pub trait DocFormatter {
    fn format_summary(&self, summary: &str) -> String;

    fn format_long_description(&self, description: &str) -> String;

    fn format_tag_description(&self, description: &str) -> String;
}

/// Markdown-rendering formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl DefaultFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl DocFormatter for DefaultFormatter {
    fn format_summary(&self, summary: &str) -> String {
        NEWLINES.replace_all(summary, " ").trim().to_string()
    }

    fn format_long_description(&self, description: &str) -> String {
        // A bare <code> element is meant as a code block
        let text = if description.contains("<code>") {
            CODE_ELEMENT.replace_all(description, "<pre><code>${1}</code></pre>")
        } else {
            Cow::Borrowed(description)
        };

        let html = render_markdown(&text);
        unwrap_newlines(&html).trim().to_string()
    }

    fn format_tag_description(&self, description: &str) -> String {
        let html = render_markdown_inline(description);
        unwrap_newlines(&html).trim().to_string()
    }
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
}

fn render_markdown(text: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new_ext(text, markdown_options()));
    out
}

/// Render inline Markdown only: no paragraphs, lists or code blocks
fn render_markdown_inline(text: &str) -> String {
    let single_line: String = escape_block_marker(text.trim_start())
        .chars()
        .map(|c| if c == '\n' { LINE_SENTINEL } else { c })
        .collect();

    let events = Parser::new_ext(&single_line, markdown_options()).filter(|event| {
        !matches!(
            event,
            Event::Start(Tag::Paragraph) | Event::End(TagEnd::Paragraph)
        )
    });

    let mut out = String::new();
    html::push_html(&mut out, events);
    out.replace(LINE_SENTINEL, "\n")
}

/// Keep a leading list, heading or quote marker from starting a block
fn escape_block_marker(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let followed_by_space = |i: usize| bytes.get(i).map_or(true, |b| matches!(b, b' ' | b'\t'));

    match bytes.first() {
        Some(b'#' | b'>') => Cow::Owned(format!("\\{}", text)),
        Some(b'-' | b'+' | b'*') if followed_by_space(1) => Cow::Owned(format!("\\{}", text)),
        Some(b'`' | b'~') if text.starts_with("```") || text.starts_with("~~~") => {
            Cow::Owned(format!("\\{}", text))
        }
        Some(b'0'..=b'9') => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if matches!(bytes.get(digits), Some(b'.' | b')')) && followed_by_space(digits + 1) {
                Cow::Owned(format!("{}\\{}", &text[..digits], &text[digits..]))
            } else {
                Cow::Borrowed(text)
            }
        }
        _ => Cow::Borrowed(text),
    }
}

/// Merge hand-wrapped lines of rendered HTML.
///
/// Newlines inside `<pre><code>` survive untouched. A newline after a
/// sentence-ending period or before a list item becomes `<br>`; any other
/// single newline becomes a space. A newline that starts a blank line is
/// kept.
pub fn unwrap_newlines(html: &str) -> String {
    let text = protect_code_blocks(html);
    let text = break_after_sentences(&text);
    let text = break_before_list_items(&text);
    let text = merge_lines(&text);
    text.replace(PLACEHOLDER, "\n")
}

fn is_newline(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Whether the whitespace starting at `pos` reaches a line break
fn blank_line_ahead(bytes: &[u8], pos: usize) -> bool {
    bytes
        .get(pos..)
        .unwrap_or_default()
        .iter()
        .take_while(|b| is_space(**b))
        .any(|b| is_newline(*b))
}

fn newline_run(bytes: &[u8], pos: usize) -> usize {
    bytes
        .get(pos..)
        .unwrap_or_default()
        .iter()
        .take_while(|b| is_newline(**b))
        .count()
}

fn space_run(bytes: &[u8], pos: usize) -> usize {
    bytes
        .get(pos..)
        .unwrap_or_default()
        .iter()
        .take_while(|b| is_space(**b))
        .count()
}

/// Replace newlines between the first `<pre><code>` and the last
/// `</code></pre>` with the placeholder.
fn protect_code_blocks(html: &str) -> String {
    let Some(open) = html.find(CODE_OPEN) else {
        return html.to_string();
    };
    let start = open + CODE_OPEN.len();
    let Some(end) = html.rfind(CODE_CLOSE).filter(|&end| end > start) else {
        return html.to_string();
    };

    let protected = html[start..end].replace(['\n', '\r'], PLACEHOLDER);

    format!("{}{}{}", &html[..start], protected, &html[end..])
}

/// `.` followed by newlines, not starting a blank line, becomes `.<br>`
fn break_after_sentences(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'.' {
            let run = newline_run(bytes, i + 1);
            if run > 0 && !blank_line_ahead(bytes, i + 1 + run) {
                out.push_str(&text[copied..i]);
                out.push_str(".<br>");
                i += 1 + run;
                copied = i;
                continue;
            }
        }
        i += 1;
    }
    out.push_str(&text[copied..]);

    out
}

/// Newlines followed by an indented `* ` or `- ` item become `<br>`
fn break_before_list_items(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if is_newline(bytes[i]) {
            let run = newline_run(bytes, i);
            let marker = i + space_run(bytes, i);
            let is_item = matches!(bytes.get(marker), Some(b'*' | b'-'))
                && bytes.get(marker + 1) == Some(&b' ');

            if is_item && !blank_line_ahead(bytes, marker + 2) {
                // The item's indentation needs at least one whitespace
                // character; when only newlines precede the marker, the last
                // one serves as indentation.
                let consumed = if marker > i + run { run } else { run - 1 };
                if consumed > 0 {
                    out.push_str(&text[copied..i]);
                    out.push_str("<br>");
                    out.push_str(&text[i + consumed..marker + 2]);
                    i = marker + 2;
                    copied = i;
                    continue;
                }
            }
        }
        i += 1;
    }
    out.push_str(&text[copied..]);

    out
}

/// A newline that does not start a blank line becomes a space
fn merge_lines(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;

    for i in 0..bytes.len() {
        if is_newline(bytes[i]) && !blank_line_ahead(bytes, i + 1) {
            out.push_str(&text[copied..i]);
            out.push(' ');
            copied = i + 1;
        }
    }
    out.push_str(&text[copied..]);

    out
}
