//! Mapping from schema type expressions to Rust types.
//!
//! | Schema | Rust |
//! |--------|------|
//! | `string` / `int` / `float` / `bool` | `String` / `i64` / `f64` / `bool` |
//! | `T[]` | `Vec<T>` |
//! | `T?`, `T \| null` | `Option<T>` |
//! | `map<K, V>` | `std::collections::HashMap<K, V>` |
//! | `"literal"`, `"a" \| "b"` | `String` |
//! | any other union | `serde_json::Value` |
//!
//! Declared class and enum names resolve to their generated identifiers.

use std::collections::HashMap;

use baml_define::{Primitive, TypeExpr};
use proc_macro2::TokenStream;
use quote::quote;

use crate::naming::{ident, type_name};

/// Generated type names known to one invocation, keyed by source name.
#[derive(Debug, Clone, Default)]
pub struct TypeContext {
    declared: HashMap<String, String>,
}

impl TypeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a declared class or enum. Returns `false` if the source name
    /// is already registered.
    pub fn declare(&mut self, source_name: &str, generated: impl Into<String>) -> bool {
        if self.declared.contains_key(source_name) {
            return false;
        }
        self.declared.insert(source_name.to_string(), generated.into());
        true
    }

    /// Generated name for a source type name, declared or not.
    pub fn resolve(&self, source_name: &str) -> String {
        self.declared
            .get(source_name)
            .cloned()
            .unwrap_or_else(|| type_name(source_name))
    }

    pub fn is_declared(&self, source_name: &str) -> bool {
        self.declared.contains_key(source_name)
    }

    /// Returns `true` if any generated name equals `generated`.
    pub fn has_generated(&self, generated: &str) -> bool {
        self.declared.values().any(|name| name == generated)
    }

    /// Returns `true` if `expr` mentions a declared type anywhere.
    pub fn references_declared(&self, expr: &TypeExpr) -> bool {
        match expr {
            TypeExpr::Named(name) => self.is_declared(name),
            TypeExpr::List(inner) | TypeExpr::Optional(inner) => self.references_declared(inner),
            TypeExpr::Map(key, value) => {
                self.references_declared(key) || self.references_declared(value)
            }
            TypeExpr::Union(branches) => branches.iter().any(|b| self.references_declared(b)),
            TypeExpr::Primitive(_) | TypeExpr::Literal(_) => false,
        }
    }
}

/// Maps a type expression to its Rust type.
pub fn rust_type(expr: &TypeExpr, ctx: &TypeContext) -> TokenStream {
    map_type(expr, ctx, None)
}

/// Maps the type of a field owned by `owner`.
///
/// A direct reference back to `owner` (bare or through `?` / `| null`) is
/// boxed so the struct has a finite size. References inside `Vec` or
/// `HashMap` are already indirect and stay unboxed.
pub fn field_type(expr: &TypeExpr, ctx: &TypeContext, owner: &str) -> TokenStream {
    map_type(expr, ctx, Some(owner))
}

/// Returns `true` if the expression maps to an `Option`.
pub fn is_optional(expr: &TypeExpr) -> bool {
    match expr {
        TypeExpr::Optional(_) => true,
        TypeExpr::Union(branches) => {
            let non_null = branches.iter().filter(|b| !b.is_null()).count();
            non_null < branches.len() && (non_null == 1 || all_literals(branches))
        }
        _ => false,
    }
}

fn map_type(expr: &TypeExpr, ctx: &TypeContext, owner: Option<&str>) -> TokenStream {
    match expr {
        TypeExpr::Primitive(primitive) => primitive_type(*primitive),
        TypeExpr::Named(name) => {
            let ty = ident(&ctx.resolve(name));
            if owner == Some(name.as_str()) {
                quote! { Box<#ty> }
            } else {
                quote! { #ty }
            }
        }
        TypeExpr::Literal(_) => quote! { String },
        TypeExpr::List(inner) => {
            let inner = map_type(inner, ctx, None);
            quote! { Vec<#inner> }
        }
        TypeExpr::Optional(inner) => {
            if is_optional(inner) {
                return map_type(inner, ctx, owner);
            }
            let inner = map_type(inner, ctx, owner);
            quote! { Option<#inner> }
        }
        TypeExpr::Map(key, value) => {
            let key = map_type(key, ctx, None);
            let value = map_type(value, ctx, None);
            quote! { std::collections::HashMap<#key, #value> }
        }
        TypeExpr::Union(branches) => map_union(branches, ctx, owner),
    }
}

fn map_union(branches: &[TypeExpr], ctx: &TypeContext, owner: Option<&str>) -> TokenStream {
    let non_null: Vec<&TypeExpr> = branches.iter().filter(|b| !b.is_null()).collect();
    let nullable = non_null.len() < branches.len();

    let inner = if all_literals(branches) {
        quote! { String }
    } else if let [single] = non_null.as_slice() {
        map_type(single, ctx, owner)
    } else {
        return quote! { serde_json::Value };
    };

    if nullable {
        quote! { Option<#inner> }
    } else {
        inner
    }
}

/// `true` when every non-null branch is a string literal (and there is at
/// least one).
fn all_literals(branches: &[TypeExpr]) -> bool {
    let mut literals = branches.iter().filter(|b| !b.is_null()).peekable();
    literals.peek().is_some() && literals.all(|b| matches!(b, TypeExpr::Literal(_)))
}

fn primitive_type(primitive: Primitive) -> TokenStream {
    match primitive {
        Primitive::String => quote! { String },
        Primitive::Int => quote! { i64 },
        Primitive::Float => quote! { f64 },
        Primitive::Bool => quote! { bool },
        Primitive::Null => quote! { serde_json::Value },
    }
}
