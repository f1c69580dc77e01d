//! Type expressions in `@param`, `@return` and friends

/// Type keywords, with their canonical spelling
const KEYWORDS: &[(&str, &str)] = &[
    ("string", "string"),
    ("int", "int"),
    ("integer", "int"),
    ("float", "float"),
    ("double", "float"),
    ("bool", "bool"),
    ("boolean", "bool"),
    ("array", "array"),
    ("object", "object"),
    ("mixed", "mixed"),
    ("callable", "callable"),
    ("iterable", "iterable"),
    ("void", "void"),
    ("null", "null"),
    ("false", "false"),
    ("true", "true"),
    ("resource", "resource"),
    ("self", "self"),
    ("static", "static"),
    ("parent", "parent"),
    ("$this", "$this"),
    ("never", "never"),
    ("scalar", "scalar"),
    ("numeric", "numeric"),
    ("array-key", "array-key"),
    ("callable-string", "callable-string"),
    ("class-string", "class-string"),
    ("non-empty-string", "non-empty-string"),
    ("positive-int", "positive-int"),
    ("negative-int", "negative-int"),
];

/// Split a type expression into its member types.
///
/// Unions and intersections (`int|string`, `A&B`) yield one entry per
/// member. Keywords are canonicalized (`integer` → `int`) and class names
/// are made fully qualified (`WP_Post` → `\WP_Post`). Generic and shaped
/// types are kept as written.
pub fn parse_types(raw: &str) -> Vec<String> {
    split_top_level(raw.trim())
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(normalize_type)
        .collect()
}

fn split_top_level(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in raw.char_indices() {
        match c {
            '<' | '(' | '{' | '[' => depth += 1,
            '>' | ')' | '}' | ']' => depth = depth.saturating_sub(1),
            '|' | '&' if depth == 0 => {
                parts.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&raw[start..]);

    parts
}

fn normalize_type(ty: &str) -> String {
    if let Some(inner) = ty.strip_prefix('?') {
        return format!("?{}", normalize_type(inner));
    }

    if let Some(base) = ty.strip_suffix("[]") {
        return format!("{}[]", normalize_type(base));
    }

    if ty.contains(['<', '(', '{', '\'', '"']) {
        return ty.to_string();
    }

    let lower = ty.to_ascii_lowercase();
    if let Some((_, canonical)) = KEYWORDS.iter().find(|(k, _)| *k == lower) {
        return (*canonical).to_string();
    }

    if ty.starts_with('\\') {
        ty.to_string()
    } else {
        format!("\\{}", ty)
    }
}
