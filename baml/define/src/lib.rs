//! BAML Definition Library
//!
//! This crate provides the intermediate representation for `.baml` schema
//! files and the parser that produces it. The representation is consumed by
//! `baml-gen` to generate strongly-typed Rust client code.
//!
//! ## Core Types
//!
//! - [`SchemaDocument`] - Everything declared in one schema file
//! - [`ClassDef`] / [`PropertyDef`] - Structured types and their fields
//! - [`EnumDef`] - String enumerations
//! - [`FunctionDef`] / [`ParameterDef`] - Remote functions and their inputs
//! - [`TypeExpr`] - Parsed form of a raw type expression such as `Person[]`
//!
//! ## Examples
//!
//! ```
//! use baml_define::parse;
//!
//! let doc = parse(
//!     r#"
//! class Person {
//!   name string
//!   kind "human" @description("Always human")
//! }
//!
//! function GetPerson(id: string) -> Person {
//!   client "openai/gpt-4o"
//! }
//! "#,
//!     "person.baml",
//! );
//!
//! assert_eq!(doc.classes[0].properties.len(), 2);
//! assert_eq!(doc.functions[0].client.as_deref(), Some("openai/gpt-4o"));
//! ```

pub mod parser;
pub mod prelude;
pub mod type_expr;
pub mod types;

pub use parser::parse;
pub use type_expr::{Primitive, TypeExpr};
pub use types::{
    ClassDef, EnumDef, FunctionDef, ParameterDef, PropertyDef, STRING_TYPE, SchemaDocument,
};
