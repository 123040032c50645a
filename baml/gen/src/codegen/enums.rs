//! Enum generation for enum declarations.

use std::collections::HashSet;

use baml_define::EnumDef;
use proc_macro2::TokenStream;
use quote::quote;
use tracing::warn;

use crate::naming::{ident, variant_name};
use crate::type_map::TypeContext;

/// Generates a Rust enum for an enum declaration.
///
/// Variants are PascalCase and serialize as the original value. Duplicate
/// values, and values whose variant name is already taken, keep the first
/// occurrence.
///
/// ## Examples
///
/// ```ignore
/// // Input:
/// enum Status { "in_progress", DONE }
///
/// // Generated:
/// pub enum Status {
///     #[serde(rename = "in_progress")]
///     InProgress,
///     #[serde(rename = "DONE")]
///     Done,
/// }
/// ```
pub fn generate_enum(def: &EnumDef, ctx: &TypeContext) -> TokenStream {
    let enum_ident = ident(&ctx.resolve(&def.name));
    let doc = format!(" Generated from enum `{}`.", def.name);

    let mut seen_values = HashSet::new();
    let mut seen_variants = HashSet::new();
    let mut variants = Vec::new();
    let mut wire_values = Vec::new();

    for value in &def.values {
        if !seen_values.insert(value.as_str()) {
            warn!(enum_name = %def.name, value = %value, "skipping duplicate enum value");
            continue;
        }
        let variant = variant_name(value);
        if !seen_variants.insert(variant.clone()) {
            warn!(
                enum_name = %def.name,
                value = %value,
                variant = %variant,
                "skipping enum value whose variant name is already taken"
            );
            continue;
        }
        variants.push(ident(&variant));
        wire_values.push(value.as_str());
    }

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum #enum_ident {
            #(
                #[serde(rename = #wire_values)]
                #variants,
            )*
        }

        impl #enum_ident {
            /// Returns the value exactly as declared in the schema.
            pub fn as_str(&self) -> &'static str {
                match *self {
                    #(Self::#variants => #wire_values,)*
                }
            }
        }

        impl std::fmt::Display for #enum_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    }
}
