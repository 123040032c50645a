//! BAML code generator library.
//!
//! This crate turns parsed schema documents from `baml-define` into Rust
//! source that compiles against the `baml` runtime crate. Each invocation
//! produces two units:
//!
//! - a **types** unit with one serde-ready struct per class and one enum per
//!   enum declaration
//! - a **client** unit with a parameter struct per function (implementing
//!   `baml::BamlFunction`) and a `BamlClient` facade with a blocking and a
//!   streaming method per function
//!
//! ## Modules
//!
//! - [`codegen`] - Code generation for individual declarations
//! - [`output`] - Unit assembly, validation, formatting and file writing
//! - [`type_map`] - Mapping of schema type expressions onto Rust types
//! - [`naming`] - Identifier conversion and keyword escaping
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use baml_gen::output::{generate, write_units};
//!
//! let doc = baml_define::parse("class Person { name string }", "person.baml");
//! let files = generate(&[doc], "baml_client").unwrap();
//! write_units(&files, Path::new("src/baml_client"), false).unwrap();
//! ```

pub mod codegen;
pub mod errors;
pub mod naming;
pub mod output;
pub mod type_map;

#[cfg(test)]
mod test_utils;

pub use errors::GeneratorError;
pub use output::{
    GenerationReport, SchemaSource, generate, generate_for_document, generate_from_paths,
    generate_per_document, read_sources, write_units,
};
