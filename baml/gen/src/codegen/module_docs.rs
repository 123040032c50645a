//! Module documentation for generated units.
//!
//! This module provides the [`ModuleDocBuilder`] struct for generating the
//! inner doc comments at the top of each generated file: what the unit
//! holds, which namespace it belongs to and where it expects to be mounted.

use proc_macro2::TokenStream;
use quote::quote;

/// Which of the two generated units is being documented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Classes and enums.
    Types,
    /// Parameter structs and the client.
    Client,
}

/// Builds module-level documentation for a generated unit.
///
/// ## Examples
///
/// ```ignore
/// use baml_gen::codegen::{ModuleDocBuilder, UnitKind};
///
/// let namespace = vec!["my_app".to_string(), "baml".to_string()];
/// let docs = ModuleDocBuilder::new(UnitKind::Types, &namespace, "baml_types")
///     .items(["Resume (class)".to_string()])
///     .build();
/// ```
pub struct ModuleDocBuilder<'a> {
    kind: UnitKind,
    namespace: &'a [String],
    module: &'a str,
    items: Vec<String>,
}

impl<'a> ModuleDocBuilder<'a> {
    /// Creates a builder for the unit `module` inside `namespace`.
    pub fn new(kind: UnitKind, namespace: &'a [String], module: &'a str) -> Self {
        Self {
            kind,
            namespace,
            module,
            items: Vec::new(),
        }
    }

    /// Lists the generated items in the contents section.
    pub fn items(mut self, items: impl IntoIterator<Item = String>) -> Self {
        self.items.extend(items);
        self
    }

    /// Builds the documentation as one `#![doc = "..."]` attribute per line,
    /// so each line renders as a `//!` comment.
    pub fn build(&self) -> TokenStream {
        let sections = [
            self.intro_paragraph(),
            self.mount_section(),
            self.contents_section(),
        ];
        let text = sections.join("\n\n");
        let lines = text.lines();

        quote! {
            #(#![doc = #lines])*
        }
    }

    fn intro_paragraph(&self) -> String {
        match self.kind {
            UnitKind::Types => {
                " Types generated from BAML class and enum declarations.".to_string()
            }
            UnitKind::Client => {
                " Client generated from BAML function declarations.\n\n Each function has a blocking method and a `stream_` method that \
                 forward to `baml::BamlRuntime`."
                    .to_string()
            }
        }
    }

    fn mount_section(&self) -> String {
        if self.namespace.is_empty() {
            format!(
                " ## Mounting\n\n Namespace: none. Declare `mod {};` next to its companion unit.",
                self.module
            )
        } else {
            let namespace = self.namespace.join("::");
            format!(
                " ## Mounting\n\n Namespace: `{namespace}`. Expected at `crate::{namespace}::{}`.",
                self.module
            )
        }
    }

    fn contents_section(&self) -> String {
        if self.items.is_empty() {
            return " ## Contents\n\n Nothing is declared in this unit.".to_string();
        }
        let lines: Vec<String> = self.items.iter().map(|item| format!(" - {item}")).collect();
        format!(" ## Contents\n\n{}", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::format_generated_code;

    fn namespace() -> Vec<String> {
        vec!["my_app".to_string(), "baml".to_string()]
    }

    #[test]
    fn mount_section_names_full_path() {
        let ns = namespace();
        let builder = ModuleDocBuilder::new(UnitKind::Types, &ns, "baml_types");
        assert_eq!(
            builder.mount_section(),
            " ## Mounting\n\n Namespace: `my_app::baml`. Expected at `crate::my_app::baml::baml_types`."
        );
    }

    #[test]
    fn mount_section_without_namespace() {
        let builder = ModuleDocBuilder::new(UnitKind::Client, &[], "resume_client");
        assert!(builder.mount_section().contains("`mod resume_client;`"));
    }

    #[test]
    fn contents_lists_items() {
        let ns = namespace();
        let builder = ModuleDocBuilder::new(UnitKind::Types, &ns, "baml_types")
            .items(["`Resume` (class)".to_string(), "`Level` (enum)".to_string()]);
        let contents = builder.contents_section();
        assert!(contents.contains(" - `Resume` (class)"));
        assert!(contents.contains(" - `Level` (enum)"));
    }

    #[test]
    fn build_renders_every_line_as_line_comment() {
        let ns = namespace();
        let tokens = ModuleDocBuilder::new(UnitKind::Client, &ns, "baml_client")
            .items(["`Ping` (`PingParams`)".to_string(), "`BamlClient`".to_string()])
            .build();
        let code = format_generated_code(&tokens).unwrap();

        assert!(!code.contains("/*!"));
        assert!(code.lines().all(|line| line.starts_with("//!") || line.trim().is_empty()));
        assert!(code.contains("//! ## Mounting"));
        assert!(code.contains("//! - `BamlClient`"));
    }

    #[test]
    fn build_produces_inner_doc_attributes() {
        let ns = namespace();
        let tokens = ModuleDocBuilder::new(UnitKind::Client, &ns, "baml_client").build();
        let file: syn::File = syn::parse2(tokens).unwrap();
        assert!(file.items.is_empty());
        assert!(file.attrs.len() >= 3);
    }
}
