//! Code generation modules for BAML schemas.
//!
//! Each submodule turns one kind of declaration into Rust source tokens.
//!
//! ## Submodules
//!
//! - [`classes`] - Generates a struct per class
//! - [`enums`] - Generates an enum per enum declaration
//! - [`functions`] - Resolves function names and generates parameter structs
//! - [`client`] - Generates the `BamlClient` struct and its methods
//! - [`module_docs`] - Generates module-level documentation for each unit
//!
//! ## Output Format
//!
//! All generators return `proc_macro2::TokenStream`, which is then:
//! - Validated with `syn::parse2` to ensure correctness
//! - Formatted with `prettyplease` for consistent style
//!
//! See [`crate::output`] for the assembly and file writing logic.

pub mod classes;
pub mod client;
pub mod enums;
pub mod functions;
pub mod module_docs;

pub use classes::generate_class;
pub use client::{CLIENT_STRUCT, generate_client};
pub use enums::generate_enum;
pub use functions::{FunctionPlan, RESERVED_METHODS, generate_params_struct, plan_functions};
pub use module_docs::{ModuleDocBuilder, UnitKind};
