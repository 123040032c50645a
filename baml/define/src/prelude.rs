//! Convenient re-exports for working with parsed schema documents.
//!
//! ```
//! use baml_define::prelude::*;
//!
//! let doc: SchemaDocument = parse("enum Color { Red, Green }", "colors.baml");
//! assert_eq!(doc.enums[0].values, vec!["Red", "Green"]);
//! ```

pub use crate::parser::parse;
pub use crate::type_expr::{Primitive, TypeExpr};
pub use crate::types::{ClassDef, EnumDef, FunctionDef, ParameterDef, PropertyDef, SchemaDocument};
