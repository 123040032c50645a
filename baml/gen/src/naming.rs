//! Identifier transforms for generated code.
//!
//! Schema names are free-form (`firstName`, `in-progress`, `2FA`); Rust
//! identifiers are not. Every transform here returns something that
//! [`Ident::new`] accepts, mapping keywords to raw identifiers where Rust
//! allows it and appending `_` where it does not.

use proc_macro2::{Ident, Span};

/// Strict and reserved keywords, treated the same way.
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["self", "Self", "super", "crate"];

/// Splits a camelCase or PascalCase identifier into its component words.
///
/// Splitting rules:
/// - Split before an uppercase letter that follows a lowercase letter
/// - Split before an uppercase letter that is followed by a lowercase
///   letter and preceded by an uppercase letter (handles acronyms)
///
/// ## Examples
///
/// ```ignore
/// assert_eq!(split_camel_case("ExtractResume"), vec!["Extract", "Resume"]);
/// assert_eq!(split_camel_case("HTTPClient"), vec!["HTTP", "Client"]);
/// ```
fn split_camel_case(s: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut word_start = 0;
    let chars: Vec<(usize, char)> = s.char_indices().collect();

    for i in 1..chars.len() {
        let (offset, current) = chars[i];
        let prev = chars[i - 1].1;

        let is_new_word = current.is_uppercase()
            && (prev.is_lowercase()
                || (i + 1 < chars.len() && chars[i + 1].1.is_lowercase() && prev.is_uppercase()));

        if is_new_word {
            if offset > word_start {
                words.push(&s[word_start..offset]);
            }
            word_start = offset;
        }
    }

    if word_start < s.len() {
        words.push(&s[word_start..]);
    }

    words
}

/// Splits any identifier-ish text into words, treating every character
/// outside `[A-Za-z0-9]` as a separator.
pub fn split_words(s: &str) -> Vec<&str> {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .flat_map(split_camel_case)
        .collect()
}

/// `ExtractResume` -> `extract_resume`
pub fn to_snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// `in_progress` -> `InProgress`, `HIGH` -> `High`
pub fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

/// `firstName` -> `FIRST_NAME`
pub fn to_screaming_snake_case(s: &str) -> String {
    to_snake_case(s).to_ascii_uppercase()
}

/// Creates an identifier, escaping keywords.
///
/// `name` must already consist of ASCII alphanumerics and underscores and
/// must not start with a digit.
pub fn ident(name: &str) -> Ident {
    if NON_RAW_KEYWORDS.contains(&name) || name == "_" {
        Ident::new(&format!("{name}_"), Span::call_site())
    } else if RUST_KEYWORDS.contains(&name) {
        Ident::new_raw(name, Span::call_site())
    } else {
        Ident::new(name, Span::call_site())
    }
}

/// snake_case identifier text for fields, parameters, methods and modules.
///
/// Returns `fallback` when nothing usable remains.
pub fn snake_name(source: &str, fallback: &str) -> String {
    let snake = to_snake_case(source);
    if snake.is_empty() {
        fallback.to_string()
    } else if snake.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{snake}")
    } else {
        snake
    }
}

/// Field identifier for a property or parameter name.
pub fn field_ident(source: &str) -> Ident {
    ident(&snake_name(source, "field"))
}

/// Type name for a class or enum, keeping the source casing.
///
/// ## Examples
///
/// ```
/// use baml_gen::naming::type_name;
///
/// assert_eq!(type_name("Resume"), "Resume");
/// assert_eq!(type_name("2FA"), "_2FA");
/// assert_eq!(type_name("Self"), "Self_");
/// ```
pub fn type_name(source: &str) -> String {
    let mut name: String = source
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if name.chars().all(|c| c == '_') {
        return "Unnamed".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    if NON_RAW_KEYWORDS.contains(&name.as_str()) {
        name.push('_');
    }
    name
}

/// Enum variant name for a declared value.
///
/// ## Examples
///
/// ```
/// use baml_gen::naming::variant_name;
///
/// assert_eq!(variant_name("in_progress"), "InProgress");
/// assert_eq!(variant_name("HIGH"), "High");
/// assert_eq!(variant_name("2xl"), "V2xl");
/// ```
pub fn variant_name(value: &str) -> String {
    let pascal = to_pascal_case(value);
    if pascal.is_empty() {
        "Value".to_string()
    } else if pascal.starts_with(|c: char| c.is_ascii_digit()) {
        format!("V{pascal}")
    } else if pascal == "Self" {
        "Self_".to_string()
    } else {
        pascal
    }
}

/// Normalizes a namespace into module path segments.
///
/// Both `.` and `::` separate segments. A leading `crate` segment is
/// dropped and each remaining segment becomes snake_case.
///
/// ## Examples
///
/// ```
/// use baml_gen::naming::namespace_segments;
///
/// assert_eq!(namespace_segments("MyApp.Baml"), vec!["my_app", "baml"]);
/// assert_eq!(namespace_segments("crate::my_app::baml"), vec!["my_app", "baml"]);
/// assert!(namespace_segments("").is_empty());
/// ```
pub fn namespace_segments(namespace: &str) -> Vec<String> {
    let normalized = namespace.replace("::", ".");
    let mut segments: Vec<&str> = normalized
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if segments.first() == Some(&"crate") {
        segments.remove(0);
    }
    segments
        .into_iter()
        .map(|segment| snake_name(segment, "module"))
        .collect()
}
