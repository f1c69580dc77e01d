//! Hook name reconstruction
//!
//! Hook names are often built at runtime (`'save_post_' . $post_type`).
//! The name is recovered from the rendered first argument so that every
//! hook of such a family shares one symbolic name (`save_post_{$post_type}`).

use regex::Regex;
use std::sync::LazyLock;

/// Optional quoted prefix, one variable, optional quoted suffix
static TEMPLATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:['"]([^'"]*)['"]\s*\.\s*)?(\$\S+)(?:\s*\.\s*['"]([^'"]*)['"])?"#)
        .expect("valid hook name pattern")
});

/// Resolve a hook name from the rendered first argument of a hook call.
///
/// Returns an empty string when the call has no arguments.
pub fn resolve_hook_name(first_arg: Option<&str>) -> String {
    let Some(rendered) = first_arg else {
        return String::new();
    };

    if let Some(literal) = simple_literal(rendered) {
        return literal.to_string();
    }

    if let Some(caps) = TEMPLATED.captures(rendered) {
        let prefix = caps.get(1).map_or("", |m| m.as_str());
        let variable = caps.get(2).map_or("", |m| m.as_str());
        return match caps.get(3) {
            Some(suffix) => format!("{}{{{}}}{}", prefix, variable, suffix.as_str()),
            None => format!("{}{{{}}}", prefix, variable),
        };
    }

    rendered.to_string()
}

/// Contents of a quoted string without any quote characters inside
fn simple_literal(rendered: &str) -> Option<&str> {
    let quote = rendered.chars().next().filter(|c| matches!(c, '\'' | '"'))?;
    let inner = rendered.strip_prefix(quote)?.strip_suffix(quote)?;
    if inner.contains(['\'', '"']) {
        None
    } else {
        Some(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_literal() {
        assert_eq!(resolve_hook_name(Some("'simple_name'")), "simple_name");
        assert_eq!(resolve_hook_name(Some("\"double_quoted\"")), "double_quoted");
    }

    #[test]
    fn test_interpolated_string_is_literal() {
        assert_eq!(
            resolve_hook_name(Some("\"widget_{$id}_updated\"")),
            "widget_{$id}_updated"
        );
    }

    #[test]
    fn test_concatenation() {
        assert_eq!(
            resolve_hook_name(Some("\"prefix_\" . $id . \"_suffix\"")),
            "prefix_{$id}_suffix"
        );
        assert_eq!(
            resolve_hook_name(Some("'save_post_' . $post->post_type")),
            "save_post_{$post->post_type}"
        );
        assert_eq!(
            resolve_hook_name(Some("$this->prefix . '_init'")),
            "{$this->prefix}_init"
        );
    }

    #[test]
    fn test_lone_variable() {
        assert_eq!(resolve_hook_name(Some("$dynamic")), "{$dynamic}");
    }

    #[test]
    fn test_fallback_keeps_rendering() {
        assert_eq!(resolve_hook_name(Some("get_hook_name()")), "get_hook_name()");
        assert_eq!(
            resolve_hook_name(Some("'a' . get_b() . 'c'")),
            "'a' . get_b() . 'c'"
        );
    }

    #[test]
    fn test_missing_argument() {
        assert_eq!(resolve_hook_name(None), "");
    }

    #[test]
    fn test_mismatched_quotes_are_not_a_literal() {
        assert_eq!(simple_literal("'abc\""), None);
        assert_eq!(simple_literal("'"), None);
    }
}
