//! Struct generation for class declarations.

use std::collections::HashSet;

use baml_define::{ClassDef, PropertyDef, TypeExpr};
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use tracing::warn;

use crate::naming::{field_ident, ident, snake_name};
use crate::type_map::{TypeContext, field_type, is_optional};

/// Generates a struct for a class declaration.
///
/// Every field keeps its source name on the wire through
/// `#[serde(rename = "...")]`. Literal properties become `String` fields and
/// also get an associated constant holding the literal.
///
/// ## Examples
///
/// ```ignore
/// // Input:
/// class Resume {
///   fullName string @description("Legal name")
///   kind "resume"
/// }
///
/// // Generated:
/// #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
/// pub struct Resume {
///     /// Legal name
///     #[serde(rename = "fullName")]
///     pub full_name: String,
///     /// Always `"resume"`.
///     #[serde(rename = "kind")]
///     pub kind: String,
/// }
///
/// impl Resume {
///     pub const KIND: &str = "resume";
/// }
/// ```
pub fn generate_class(class: &ClassDef, ctx: &TypeContext) -> TokenStream {
    let struct_ident = ident(&ctx.resolve(&class.name));
    let doc = format!(" Generated from class `{}`.", class.name);

    let mut seen = HashSet::new();
    let mut fields = Vec::new();
    let mut constants = Vec::new();

    for property in &class.properties {
        let field = field_ident(&property.name);
        if !seen.insert(field.to_string()) {
            warn!(
                class = %class.name,
                property = %property.name,
                "skipping property whose field name is already taken"
            );
            continue;
        }

        fields.push(generate_field(property, &field, ctx, &class.name));
        if let Some(value) = &property.literal {
            let const_ident = ident(&snake_name(&property.name, "field").to_ascii_uppercase());
            constants.push(quote! {
                pub const #const_ident: &str = #value;
            });
        }
    }

    let constants_impl = if constants.is_empty() {
        quote! {}
    } else {
        quote! {
            impl #struct_ident {
                #(#constants)*
            }
        }
    };

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct #struct_ident {
            #(#fields)*
        }

        #constants_impl
    }
}

fn generate_field(
    property: &PropertyDef,
    field: &Ident,
    ctx: &TypeContext,
    owner: &str,
) -> TokenStream {
    let expr = TypeExpr::parse(&property.type_name);
    let ty = field_type(&expr, ctx, owner);
    let serde_attr = serde_field_attr(&property.name, &expr);

    let mut docs = Vec::new();
    if let Some(description) = &property.description {
        docs.push(format!(" {description}"));
    }
    if let Some(value) = &property.literal {
        docs.push(format!(" Always `\"{value}\"`."));
    }

    quote! {
        #(#[doc = #docs])*
        #serde_attr
        pub #field: #ty,
    }
}

/// `#[serde(...)]` for a field with wire name `wire_name`. Optional fields may
/// be absent on the wire in either direction.
pub(crate) fn serde_field_attr(wire_name: &str, expr: &TypeExpr) -> TokenStream {
    if is_optional(expr) {
        quote! {
            #[serde(rename = #wire_name, default, skip_serializing_if = "Option::is_none")]
        }
    } else {
        quote! {
            #[serde(rename = #wire_name)]
        }
    }
}
