//! Structured form of raw type expressions.
//!
//! Schema files spell types as short expressions: `string`, `Person[]`,
//! `int?`, `map<string, Score>`, `"pending" | "done"`. [`TypeExpr::parse`]
//! turns that text into a tree the generator can map onto Rust types.
//! Parsing is total: anything unrecognised becomes [`TypeExpr::Named`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Built-in scalar types of the schema language.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use baml_define::Primitive;
///
/// assert_eq!(Primitive::from_str("int").unwrap(), Primitive::Int);
/// assert_eq!(Primitive::Bool.to_string(), "bool");
/// assert!(Primitive::from_str("Person").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Primitive {
    String,
    Int,
    Float,
    Bool,
    Null,
}

/// A parsed type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeExpr {
    /// One of the built-in scalars.
    Primitive(Primitive),
    /// A reference to a declared class or enum (or an unknown name).
    Named(String),
    /// A quoted constant such as `"done"`.
    Literal(String),
    /// `T[]`
    List(Box<TypeExpr>),
    /// `T?`
    Optional(Box<TypeExpr>),
    /// `map<K, V>`
    Map(Box<TypeExpr>, Box<TypeExpr>),
    /// `A | B | ...`
    Union(Vec<TypeExpr>),
}

impl TypeExpr {
    /// Parses a raw type expression.
    ///
    /// ## Examples
    ///
    /// ```
    /// use baml_define::{Primitive, TypeExpr};
    ///
    /// assert_eq!(TypeExpr::parse("int"), TypeExpr::Primitive(Primitive::Int));
    /// assert_eq!(
    ///     TypeExpr::parse("Person[]"),
    ///     TypeExpr::List(Box::new(TypeExpr::Named("Person".to_string())))
    /// );
    /// assert!(matches!(TypeExpr::parse(r#""a" | "b""#), TypeExpr::Union(_)));
    /// ```
    pub fn parse(text: &str) -> Self {
        let text = text.trim();

        let branches = split_top_level(text, '|');
        if branches.len() > 1 {
            return TypeExpr::Union(branches.into_iter().map(TypeExpr::parse).collect());
        }

        if let Some(inner) = text.strip_suffix("[]") {
            return TypeExpr::List(Box::new(TypeExpr::parse(inner)));
        }
        if let Some(inner) = text.strip_suffix('?') {
            return TypeExpr::Optional(Box::new(TypeExpr::parse(inner)));
        }
        if let Some(inner) = strip_wrapping(text, '(', ')') {
            return TypeExpr::parse(inner);
        }
        if let Some(value) = strip_wrapping(text, '"', '"') {
            return TypeExpr::Literal(value.to_string());
        }
        if let Some(args) = text
            .strip_prefix("map")
            .map(str::trim_start)
            .and_then(|rest| strip_wrapping(rest, '<', '>'))
        {
            let parts = split_top_level(args, ',');
            if let [key, value] = parts.as_slice() {
                return TypeExpr::Map(
                    Box::new(TypeExpr::parse(key)),
                    Box::new(TypeExpr::parse(value)),
                );
            }
        }

        match Primitive::from_str(text) {
            Ok(primitive) => TypeExpr::Primitive(primitive),
            Err(_) => TypeExpr::Named(text.to_string()),
        }
    }

    /// Returns `true` for the `null` primitive.
    pub fn is_null(&self) -> bool {
        matches!(self, TypeExpr::Primitive(Primitive::Null))
    }

    /// Returns `true` if this expression names `type_name` directly or
    /// through an optional wrapper, which is where recursion needs boxing.
    pub fn refers_directly_to(&self, type_name: &str) -> bool {
        match self {
            TypeExpr::Named(name) => name == type_name,
            TypeExpr::Optional(inner) => inner.refers_directly_to(type_name),
            TypeExpr::Union(branches) => branches.iter().any(|b| b.refers_directly_to(type_name)),
            _ => false,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Primitive(p) => write!(f, "{p}"),
            TypeExpr::Named(name) => write!(f, "{name}"),
            TypeExpr::Literal(value) => write!(f, "\"{value}\""),
            TypeExpr::List(inner) => match inner.as_ref() {
                TypeExpr::Union(_) => write!(f, "({inner})[]"),
                _ => write!(f, "{inner}[]"),
            },
            TypeExpr::Optional(inner) => match inner.as_ref() {
                TypeExpr::Union(_) => write!(f, "({inner})?"),
                _ => write!(f, "{inner}?"),
            },
            TypeExpr::Map(key, value) => write!(f, "map<{key}, {value}>"),
            TypeExpr::Union(branches) => {
                for (idx, branch) in branches.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{branch}")?;
                }
                Ok(())
            }
        }
    }
}

/// Returns the text between `open` and `close` when they wrap the whole input.
fn strip_wrapping(text: &str, open: char, close: char) -> Option<&str> {
    let inner = text.strip_prefix(open)?.strip_suffix(close)?;
    // `(a) | (b)` starts and ends with parens but is not wrapped by one pair.
    let mut depth = 0i32;
    for c in inner.chars() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth < 0 {
                return None;
            }
        }
    }
    Some(inner.trim())
}

/// Splits `text` on `separator` while ignoring separators nested inside
/// `<>`, `()`, `[]` or double quotes.
pub(crate) fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_quotes = false;
    let mut start = 0;

    for (idx, c) in text.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '<' | '(' | '[' if !in_quotes => depth += 1,
            '>' | ')' | ']' if !in_quotes => depth -= 1,
            c if c == separator && depth == 0 && !in_quotes => {
                parts.push(text[start..idx].trim());
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}
