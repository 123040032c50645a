//! Shared test utilities for baml-gen tests.
//!
//! Fixture builders for schema declarations plus helpers that validate and
//! pretty-print emitted tokens.

use baml_define::{ClassDef, EnumDef, FunctionDef, ParameterDef, PropertyDef, SchemaDocument};
use proc_macro2::TokenStream;

/// Creates a class with the given properties.
pub fn make_class(name: &str, properties: Vec<PropertyDef>) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        properties,
    }
}

/// Creates an enum with the given values, in order.
pub fn make_enum(name: &str, values: &[&str]) -> EnumDef {
    EnumDef {
        name: name.to_string(),
        values: values.iter().map(|v| v.to_string()).collect(),
    }
}

/// Creates a function declaration.
///
/// ## Arguments
///
/// * `name` - Function name (sent on the wire)
/// * `params` - `(name, type expression)` pairs in declaration order
/// * `return_type` - Raw return type expression
/// * `client` - Optional backend identifier
pub fn make_function(
    name: &str,
    params: &[(&str, &str)],
    return_type: &str,
    client: Option<&str>,
) -> FunctionDef {
    FunctionDef {
        name: name.to_string(),
        return_type: return_type.to_string(),
        client: client.map(str::to_string),
        parameters: params
            .iter()
            .map(|(name, ty)| ParameterDef::new(*name, *ty))
            .collect(),
    }
}

/// Creates a document from already-built declarations.
pub fn make_document(
    path: &str,
    classes: Vec<ClassDef>,
    enums: Vec<EnumDef>,
    functions: Vec<FunctionDef>,
) -> SchemaDocument {
    SchemaDocument {
        path: path.to_string(),
        classes,
        enums,
        functions,
    }
}

/// Formats generated code using prettyplease.
///
/// ## Errors
///
/// Returns an error string if the code fails to parse.
pub fn format_generated_code(tokens: &TokenStream) -> Result<String, String> {
    let file = syn::parse2::<syn::File>(tokens.clone()).map_err(|e| e.to_string())?;
    Ok(prettyplease::unparse(&file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    #[test]
    fn make_function_keeps_parameter_order() {
        let function = make_function("F", &[("b", "int"), ("a", "string")], "bool", Some("c"));
        let names: Vec<_> = function.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(function.client.as_deref(), Some("c"));
    }

    #[test]
    fn make_document_is_not_empty() {
        let doc = make_document("a.baml", vec![], vec![make_enum("E", &["x"])], vec![]);
        assert!(!doc.is_empty());
        assert_eq!(doc.enums[0].values, vec!["x"]);
    }

    #[test]
    fn format_generated_code_rejects_invalid_tokens() {
        assert!(format_generated_code(&quote! { pub struct }).is_err());
        assert!(format_generated_code(&quote! { pub struct A; }).is_ok());
    }
}
