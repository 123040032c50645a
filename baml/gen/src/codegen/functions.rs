//! Parameter structs for function declarations.
//!
//! Each function gets a `<Function>Params` struct with one typed field per
//! declared parameter, a `new()` constructor and a `baml::BamlFunction`
//! impl that carries the wire name, the declared client and the result type.

use std::collections::HashSet;

use baml_define::{FunctionDef, TypeExpr};
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use tracing::warn;

use super::classes::serde_field_attr;
use crate::naming::{field_ident, ident, snake_name};
use crate::type_map::{TypeContext, rust_type};

/// Method names the generated client defines itself.
pub const RESERVED_METHODS: &[&str] = &["new", "from_shared", "runtime"];

/// Suffix of the parameter struct name.
const PARAMS_SUFFIX: &str = "Params";

/// Suffix used when `<Function>Params` is already a declared type.
const FALLBACK_PARAMS_SUFFIX: &str = "FunctionParams";

/// Resolved names for one generated function.
#[derive(Debug, Clone)]
pub struct FunctionPlan<'a> {
    pub function: &'a FunctionDef,
    pub params_ident: Ident,
    pub method_ident: Ident,
    pub stream_method_ident: Ident,
    pub return_type: TypeExpr,
}

/// Resolves identifiers for `functions`, in order.
///
/// A function whose blocking or streaming method name is reserved or already
/// taken by an earlier function is skipped with a warning.
pub fn plan_functions<'a>(functions: &[&'a FunctionDef], ctx: &TypeContext) -> Vec<FunctionPlan<'a>> {
    let mut methods: HashSet<String> = RESERVED_METHODS.iter().map(|m| m.to_string()).collect();
    let mut params_names = HashSet::new();
    let mut plans = Vec::new();

    for function in functions.iter().copied() {
        let method = snake_name(&function.name, "call");
        let stream_method = format!("stream_{method}");
        if methods.contains(&method) || methods.contains(&stream_method) {
            warn!(
                function = %function.name,
                method = %method,
                "skipping function whose method name is already taken"
            );
            continue;
        }

        let Some(params_name) = params_struct_name(function, ctx, &params_names) else {
            warn!(
                function = %function.name,
                "skipping function whose parameter struct name is already taken"
            );
            continue;
        };

        methods.insert(method.clone());
        methods.insert(stream_method.clone());
        params_names.insert(params_name.clone());

        plans.push(FunctionPlan {
            function,
            params_ident: ident(&params_name),
            method_ident: ident(&method),
            stream_method_ident: ident(&stream_method),
            return_type: TypeExpr::parse(&function.return_type),
        });
    }

    plans
}

fn params_struct_name(
    function: &FunctionDef,
    ctx: &TypeContext,
    taken: &HashSet<String>,
) -> Option<String> {
    let base = ctx.resolve(&function.name);
    [PARAMS_SUFFIX, FALLBACK_PARAMS_SUFFIX]
        .iter()
        .map(|suffix| format!("{base}{suffix}"))
        .find(|name| !ctx.has_generated(name) && !taken.contains(name))
}

/// Generates the parameter struct and its `BamlFunction` impl.
///
/// ## Examples
///
/// ```ignore
/// // Input:
/// function ExtractResume(resume_text: string) -> Resume { client "openai/gpt-4o" }
///
/// // Generated:
/// pub struct ExtractResumeParams {
///     #[serde(rename = "resume_text")]
///     pub resume_text: String,
/// }
///
/// impl baml::BamlFunction for ExtractResumeParams {
///     const NAME: &'static str = "ExtractResume";
///     const CLIENT: Option<&'static str> = Some("openai/gpt-4o");
///     type Output = Resume;
/// }
/// ```
pub fn generate_params_struct(plan: &FunctionPlan<'_>, ctx: &TypeContext) -> TokenStream {
    let function = plan.function;
    let params_ident = &plan.params_ident;
    let name = function.name.as_str();
    let output = rust_type(&plan.return_type, ctx);
    let doc = format!(" Parameters for `{name}`.");

    let mut seen = HashSet::new();
    let mut fields = Vec::new();
    let mut args = Vec::new();
    let mut arg_types = Vec::new();

    for parameter in &function.parameters {
        let field = field_ident(&parameter.name);
        if !seen.insert(field.to_string()) {
            warn!(
                function = %name,
                parameter = %parameter.name,
                "skipping parameter whose field name is already taken"
            );
            continue;
        }
        let expr = TypeExpr::parse(&parameter.type_expr);
        let ty = rust_type(&expr, ctx);
        let serde_attr = serde_field_attr(&parameter.name, &expr);

        fields.push(quote! {
            #serde_attr
            pub #field: #ty,
        });
        args.push(field);
        arg_types.push(ty);
    }

    let derives = if args.is_empty() {
        quote! { #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)] }
    } else {
        quote! { #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)] }
    };

    let many_args_allow = if args.len() > 7 {
        quote! { #[allow(clippy::too_many_arguments)] }
    } else {
        quote! {}
    };

    let client = match &function.client {
        Some(client) => quote! { Some(#client) },
        None => quote! { None },
    };

    let ctor_doc = format!(" Creates the parameters for `{name}`.");

    quote! {
        #[doc = #doc]
        #derives
        pub struct #params_ident {
            #(#fields)*
        }

        impl #params_ident {
            #[doc = #ctor_doc]
            #many_args_allow
            pub fn new(#(#args: #arg_types),*) -> Self {
                Self { #(#args),* }
            }
        }

        impl baml::BamlFunction for #params_ident {
            const NAME: &'static str = #name;
            const CLIENT: Option<&'static str> = #client;
            type Output = #output;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{format_generated_code, make_function};

    #[test]
    fn generates_params_struct_with_constructor() {
        let function = make_function(
            "ExtractResume",
            &[("resume_text", "string"), ("maxItems", "int?")],
            "Resume",
            Some("openai/gpt-4o"),
        );
        let ctx = TypeContext::new();
        let plans = plan_functions(&[&function], &ctx);
        let code = format_generated_code(&generate_params_struct(&plans[0], &ctx)).unwrap();

        assert!(code.contains("pub struct ExtractResumeParams"));
        assert!(code.contains("pub resume_text: String"));
        assert!(code.contains("#[serde(rename = \"maxItems\""));
        assert!(code.contains("pub max_items: Option<i64>"));
        assert!(code.contains("pub fn new(resume_text: String, max_items: Option<i64>) -> Self"));
        assert!(code.contains("impl baml::BamlFunction for ExtractResumeParams"));
        assert!(code.contains("const NAME: &'static str = \"ExtractResume\";"));
        assert!(code.contains("const CLIENT: Option<&'static str> = Some(\"openai/gpt-4o\");"));
        assert!(code.contains("type Output = Resume;"));
    }

    #[test]
    fn function_without_client_or_parameters() {
        let function = make_function("Ping", &[], "string", None);
        let ctx = TypeContext::new();
        let plans = plan_functions(&[&function], &ctx);
        let code = format_generated_code(&generate_params_struct(&plans[0], &ctx)).unwrap();

        assert!(code.contains("Default"));
        assert!(code.contains("const CLIENT: Option<&'static str> = None;"));
        assert!(code.contains("pub fn new() -> Self"));
    }

    #[test]
    fn params_name_falls_back_on_collision() {
        let function = make_function("Extract", &[], "string", None);
        let mut ctx = TypeContext::new();
        ctx.declare("ExtractParams", "ExtractParams");

        let plans = plan_functions(&[&function], &ctx);
        assert_eq!(plans[0].params_ident.to_string(), "ExtractFunctionParams");
    }

    #[test]
    fn method_collisions_keep_first() {
        let first = make_function("GetUser", &[], "string", None);
        let second = make_function("get_user", &[], "int", None);
        let reserved = make_function("Runtime", &[], "int", None);
        let streaming = make_function("StreamGetUser", &[], "int", None);

        let plans = plan_functions(&[&first, &second, &reserved, &streaming], &TypeContext::new());

        let names: Vec<_> = plans.iter().map(|p| p.function.name.as_str()).collect();
        assert_eq!(names, vec!["GetUser"]);
        assert_eq!(plans[0].method_ident.to_string(), "get_user");
        assert_eq!(plans[0].stream_method_ident.to_string(), "stream_get_user");
    }

    #[test]
    fn many_parameters_allow_clippy_lint() {
        let params: Vec<(String, &str)> = (0..8).map(|i| (format!("p{i}"), "int")).collect();
        let params: Vec<(&str, &str)> = params.iter().map(|(n, t)| (n.as_str(), *t)).collect();
        let function = make_function("Wide", &params, "int", None);
        let ctx = TypeContext::new();
        let plans = plan_functions(&[&function], &ctx);
        let code = format_generated_code(&generate_params_struct(&plans[0], &ctx)).unwrap();

        assert!(code.contains("#[allow(clippy::too_many_arguments)]"));
    }
}
