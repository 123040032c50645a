//! Core types for parsed schema documents.
//!
//! The model is a forest: a [`SchemaDocument`] owns its classes, enums and
//! functions, and each of those owns its properties, values or parameters.
//! Every list preserves source order.

use serde::{Deserialize, Serialize};

/// Type name reported for every literal-valued property.
pub const STRING_TYPE: &str = "string";

/// Everything declared in a single schema file.
///
/// ## Examples
///
/// ```
/// use baml_define::SchemaDocument;
///
/// let doc = SchemaDocument::new("empty.baml");
/// assert!(doc.is_empty());
/// assert_eq!(doc.path, "empty.baml");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Path of the originating file. Informational only.
    pub path: String,
    /// Class declarations in source order.
    pub classes: Vec<ClassDef>,
    /// Enum declarations in source order.
    pub enums: Vec<EnumDef>,
    /// Function declarations in source order.
    pub functions: Vec<FunctionDef>,
}

impl SchemaDocument {
    /// Creates a document with no declarations.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Returns `true` when the document declares no classes, enums or functions.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.enums.is_empty() && self.functions.is_empty()
    }

    /// Total number of declarations across all three kinds.
    pub fn declaration_count(&self) -> usize {
        self.classes.len() + self.enums.len() + self.functions.len()
    }
}

/// A `class Name { ... }` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Class name as written in the source.
    pub name: String,
    /// Properties in source order.
    pub properties: Vec<PropertyDef>,
}

/// A single property line inside a class body.
///
/// A property is either typed (`age int`) or pinned to a literal constant
/// (`kind "person"`). Literal properties always report [`STRING_TYPE`] as
/// their type; use the constructors to keep that invariant.
///
/// ## Examples
///
/// ```
/// use baml_define::{PropertyDef, STRING_TYPE};
///
/// let typed = PropertyDef::typed("age", "int");
/// assert!(!typed.is_literal());
///
/// let pinned = PropertyDef::literal("kind", "person");
/// assert_eq!(pinned.type_name, STRING_TYPE);
/// assert_eq!(pinned.literal.as_deref(), Some("person"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDef {
    /// Property name as written in the source (case preserved).
    pub name: String,
    /// Declared type expression, or [`STRING_TYPE`] for literals.
    pub type_name: String,
    /// Text from a trailing `@description("...")`.
    pub description: Option<String>,
    /// Constant value when the property was declared as `name "value"`.
    pub literal: Option<String>,
}

impl PropertyDef {
    /// Creates a property with a declared type.
    pub fn typed(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            description: None,
            literal: None,
        }
    }

    /// Creates a literal-valued property. Its type is always [`STRING_TYPE`].
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: STRING_TYPE.to_string(),
            description: None,
            literal: Some(value.into()),
        }
    }

    /// Attaches a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns `true` if the property is pinned to a literal value.
    pub fn is_literal(&self) -> bool {
        self.literal.is_some()
    }
}

/// An `enum Name { ... }` declaration.
///
/// Values keep their source order and duplicates; no deduplication happens
/// at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    pub values: Vec<String>,
}

/// A `function Name(params) -> ReturnType { ... }` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDef {
    /// Function name as written in the source. Sent on the wire unchanged.
    pub name: String,
    /// Trimmed return type text. May encode a union (`A | B`).
    pub return_type: String,
    /// Backend identifier from a `client "..."` line in the body.
    pub client: Option<String>,
    /// Parameters in declaration order.
    pub parameters: Vec<ParameterDef>,
}

/// One `name: Type` entry of a function's parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDef {
    pub name: String,
    /// Raw type expression, e.g. `Resume[]`.
    pub type_expr: String,
}

impl ParameterDef {
    pub fn new(name: impl Into<String>, type_expr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_expr: type_expr.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_is_empty() {
        let doc = SchemaDocument::new("a.baml");
        assert!(doc.is_empty());
        assert_eq!(doc.declaration_count(), 0);
    }

    #[test]
    fn declaration_count_sums_all_kinds() {
        let mut doc = SchemaDocument::new("a.baml");
        doc.classes.push(ClassDef {
            name: "A".to_string(),
            properties: vec![],
        });
        doc.enums.push(EnumDef {
            name: "B".to_string(),
            values: vec!["x".to_string()],
        });
        doc.functions.push(FunctionDef {
            name: "C".to_string(),
            return_type: "A".to_string(),
            client: None,
            parameters: vec![],
        });

        assert!(!doc.is_empty());
        assert_eq!(doc.declaration_count(), 3);
    }

    #[test]
    fn literal_property_reports_string_type() {
        let prop = PropertyDef::literal("kind", "resume").with_description("Fixed tag");
        assert_eq!(prop.type_name, STRING_TYPE);
        assert!(prop.is_literal());
        assert_eq!(prop.description.as_deref(), Some("Fixed tag"));
    }

    #[test]
    fn document_serializes_to_json() {
        let mut doc = SchemaDocument::new("a.baml");
        doc.functions.push(FunctionDef {
            name: "F".to_string(),
            return_type: "string".to_string(),
            client: Some("c".to_string()),
            parameters: vec![ParameterDef::new("x", "int[]")],
        });

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["functions"][0]["client"], "c");
        assert_eq!(json["functions"][0]["parameters"][0]["type_expr"], "int[]");
    }
}
