//! Pattern-based parser for `.baml` schema text.
//!
//! The grammar is informal and line oriented:
//!
//! ```text
//! class Name {
//!   propName Type
//!   propName "literalValue"
//!   propName Type @description("text")
//! }
//! enum Name {
//!   "value1", "value2", unquotedValue3
//! }
//! function Name(param1: Type1, param2: Type2[]) -> ReturnType {
//!   client "provider/model-id"
//! }
//! ```
//!
//! Each declaration kind is found by scanning the whole text independently.
//! A body ends at the first closing brace, so a `}` inside a description or
//! prompt truncates it. Declarations and property lines that don't match
//! their expected shape are left out of the result instead of failing the
//! whole parse.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::type_expr::split_top_level;
use crate::types::{ClassDef, EnumDef, FunctionDef, ParameterDef, PropertyDef, SchemaDocument};

static CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bclass\s+(\w+)\s*\{([^}]*)\}").expect("Invalid regex"));

static ENUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\benum\s+(\w+)\s*\{([^}]*)\}").expect("Invalid regex"));

static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bfunction\s+(\w+)\s*\(([^)]*)\)\s*->\s*([^{]+?)\s*\{([^}]*)\}")
        .expect("Invalid regex")
});

/// `name "literal"` or `name Type`, then an optional `@description(...)`.
static PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(\w+)\s+(?:"([^"]*)"|(\w+(?:\s*<.*>)?(?:\[\])*\??))(?:\s*@description\(\s*(.*?)\s*\))?$"#,
    )
    .expect("Invalid regex")
});

static CLIENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bclient\s+(?:"([^"]+)"|(\w[\w/.\-]*))"#).expect("Invalid regex")
});

/// Parses schema text into a [`SchemaDocument`].
///
/// Never fails. An input with nothing recognisable yields a document with
/// three empty lists and the given `path`.
///
/// ## Examples
///
/// ```
/// use baml_define::parse;
///
/// let doc = parse(r#"enum T { "a", "b", "a" }"#, "t.baml");
/// assert_eq!(doc.enums[0].values, vec!["a", "b", "a"]);
///
/// let empty = parse("", "empty.baml");
/// assert!(empty.is_empty());
/// assert_eq!(empty.path, "empty.baml");
/// ```
pub fn parse(content: &str, path: &str) -> SchemaDocument {
    let document = SchemaDocument {
        path: path.to_string(),
        classes: parse_classes(content, path),
        enums: parse_enums(content),
        functions: parse_functions(content),
    };

    trace!(
        path,
        classes = document.classes.len(),
        enums = document.enums.len(),
        functions = document.functions.len(),
        "parsed schema document"
    );

    document
}

fn parse_classes(content: &str, path: &str) -> Vec<ClassDef> {
    CLASS_RE
        .captures_iter(content)
        .map(|caps| {
            let name = caps[1].to_string();
            let properties = caps[2]
                .lines()
                .map(|line| strip_line_comment(line).trim())
                .filter(|line| !line.is_empty())
                .filter_map(|line| {
                    let property = parse_property(line);
                    if property.is_none() {
                        trace!(path, class = %name, line, "skipping unrecognised property line");
                    }
                    property
                })
                .collect();
            ClassDef { name, properties }
        })
        .collect()
}

/// Matches one trimmed class-body line against the property pattern.
fn parse_property(line: &str) -> Option<PropertyDef> {
    let caps = PROPERTY_RE.captures(line)?;
    let name = &caps[1];

    let property = match (caps.get(2), caps.get(3)) {
        (Some(literal), _) => PropertyDef::literal(name, literal.as_str()),
        (None, Some(type_name)) => PropertyDef::typed(name, type_name.as_str()),
        (None, None) => return None,
    };

    Some(match caps.get(4) {
        Some(description) => property.with_description(unquote(description.as_str())),
        None => property,
    })
}

fn parse_enums(content: &str) -> Vec<EnumDef> {
    ENUM_RE
        .captures_iter(content)
        .map(|caps| {
            let values = caps[2]
                .lines()
                .map(strip_line_comment)
                .flat_map(|line| line.split(','))
                .map(|token| token.trim().trim_matches('"').trim())
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect();
            EnumDef {
                name: caps[1].to_string(),
                values,
            }
        })
        .collect()
}

fn parse_functions(content: &str) -> Vec<FunctionDef> {
    FUNCTION_RE
        .captures_iter(content)
        .map(|caps| FunctionDef {
            name: caps[1].to_string(),
            parameters: parse_parameters(&caps[2]),
            return_type: caps[3].trim().to_string(),
            client: parse_client(&caps[4]),
        })
        .collect()
}

/// Splits `a: T, b: U[]` into parameters. Entries without a colon are dropped.
fn parse_parameters(list: &str) -> Vec<ParameterDef> {
    split_top_level(list, ',')
        .into_iter()
        .filter_map(|entry| {
            let (name, type_expr) = entry.split_once(':')?;
            let (name, type_expr) = (name.trim(), type_expr.trim());
            if name.is_empty() || type_expr.is_empty() {
                return None;
            }
            Some(ParameterDef::new(name, type_expr))
        })
        .collect()
}

fn parse_client(body: &str) -> Option<String> {
    let caps = CLIENT_RE.captures(body)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Drops a trailing `// comment` that is not inside double quotes.
fn strip_line_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut prev = '\0';
    for (idx, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '/' if prev == '/' && !in_quotes => return &line[..idx - 1],
            _ => {}
        }
        prev = c;
    }
    line
}

/// Removes one layer of `"..."` or `#"..."#` quoting.
fn unquote(text: &str) -> String {
    let text = text.trim();
    text.strip_prefix("#\"")
        .and_then(|t| t.strip_suffix("\"#"))
        .or_else(|| text.strip_prefix('"').and_then(|t| t.strip_suffix('"')))
        .unwrap_or(text)
        .to_string()
}
