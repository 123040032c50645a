//! Client struct generation.
//!
//! Generates `BamlClient`, a thin wrapper over a shared `baml::BamlRuntime`
//! with one blocking and one streaming method per function.

use proc_macro2::TokenStream;
use quote::quote;

use super::functions::FunctionPlan;
use crate::naming::ident;
use crate::type_map::{TypeContext, rust_type};

/// Name of the generated client struct. Declared types may not use it.
pub const CLIENT_STRUCT: &str = "BamlClient";

/// Generates the `BamlClient` struct, its constructors and its methods.
///
/// ## Examples
///
/// ```ignore
/// // Generated for `function ExtractResume(...) -> Resume`:
/// impl BamlClient {
///     pub async fn extract_resume(
///         &self,
///         params: ExtractResumeParams,
///         cancel: Option<&baml::CancellationToken>,
///     ) -> Result<Resume, baml::RuntimeError>;
///
///     pub fn stream_extract_resume(
///         &self,
///         params: ExtractResumeParams,
///         cancel: Option<baml::CancellationToken>,
///     ) -> baml::BamlStream<'_, Resume>;
/// }
/// ```
pub fn generate_client(plans: &[FunctionPlan<'_>], ctx: &TypeContext) -> TokenStream {
    let methods: TokenStream = plans.iter().map(|plan| generate_methods(plan, ctx)).collect();
    let client_ident = ident(CLIENT_STRUCT);

    quote! {
        /// Typed client for the declared functions.
        ///
        /// Cloning is cheap; clones share one runtime and its connection pool.
        #[derive(Debug, Clone)]
        pub struct #client_ident {
            runtime: std::sync::Arc<baml::BamlRuntime>,
        }

        impl #client_ident {
            /// Creates a client that owns `runtime`.
            pub fn new(runtime: baml::BamlRuntime) -> Self {
                Self {
                    runtime: std::sync::Arc::new(runtime),
                }
            }

            /// Creates a client over a runtime shared with other clients.
            pub fn from_shared(runtime: std::sync::Arc<baml::BamlRuntime>) -> Self {
                Self { runtime }
            }

            /// Returns the underlying runtime.
            pub fn runtime(&self) -> &baml::BamlRuntime {
                &self.runtime
            }

            #methods
        }
    }
}

fn generate_methods(plan: &FunctionPlan<'_>, ctx: &TypeContext) -> TokenStream {
    let function = plan.function;
    let params = &plan.params_ident;
    let method = &plan.method_ident;
    let stream_method = &plan.stream_method_ident;
    let output = rust_type(&plan.return_type, ctx);

    let mut docs = vec![format!(" Calls `{}`.", function.name)];
    let mut stream_docs = vec![format!(
        " Streams partial results of `{}`.",
        function.name
    )];
    if let Some(client) = &function.client {
        let line = format!(" Client: `{client}`.");
        docs.extend([String::new(), line.clone()]);
        stream_docs.extend([String::new(), line]);
    }

    quote! {
        #(#[doc = #docs])*
        pub async fn #method(
            &self,
            params: #params,
            cancel: Option<&baml::CancellationToken>,
        ) -> Result<#output, baml::RuntimeError> {
            self.runtime.call_function(&params, cancel).await
        }

        #(#[doc = #stream_docs])*
        pub fn #stream_method(
            &self,
            params: #params,
            cancel: Option<baml::CancellationToken>,
        ) -> baml::BamlStream<'_, #output> {
            self.runtime.stream_function(&params, cancel)
        }
    }
}
