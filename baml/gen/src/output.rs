//! Output assembly and file writing for generated code.
//!
//! This module handles the final phase of code generation: merging parsed
//! documents, assembling the two generated units, validating and formatting
//! them, and writing them to disk atomically.
//!
//! ## Output Structure
//!
//! Every invocation produces exactly two units:
//! ```text
//! src/baml_client/
//! ├── baml_types.rs    # Classes and enums
//! └── baml_client.rs   # Parameter structs and BamlClient
//! ```
//!
//! When driven per document, the units are named after the source file
//! (`resume.baml` gives `resume_types.rs` and `resume_client.rs`).
//!
//! ## Safety Guarantees
//!
//! - **Validation**: All generated code is validated with `syn` before writing
//! - **Formatting**: Output is formatted with `prettyplease` for consistent style
//! - **Atomic writes**: Uses temp file + rename pattern to prevent partial writes

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use baml_define::{ClassDef, EnumDef, FunctionDef, SchemaDocument, TypeExpr, parse};
use proc_macro2::TokenStream;
use quote::quote;
use tracing::{debug, info, warn};

use crate::codegen::{
    CLIENT_STRUCT, FunctionPlan, ModuleDocBuilder, UnitKind, generate_class, generate_client,
    generate_enum, generate_params_struct, plan_functions,
};
use crate::errors::GeneratorError;
use crate::naming::{ident, namespace_segments, snake_name, type_name};
use crate::type_map::TypeContext;

/// Stem used by [`generate`] for merged output.
pub const DEFAULT_STEM: &str = "baml";

/// File names of the two units of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitNames {
    pub types_module: String,
    pub client_module: String,
}

impl UnitNames {
    /// `<stem>_types` and `<stem>_client`.
    pub fn for_stem(stem: &str) -> Self {
        Self {
            types_module: format!("{stem}_types"),
            client_module: format!("{stem}_client"),
        }
    }

    pub fn types_file(&self) -> String {
        format!("{}.rs", self.types_module)
    }

    pub fn client_file(&self) -> String {
        format!("{}.rs", self.client_module)
    }
}

/// One schema file to generate from.
#[derive(Debug, Clone)]
pub struct SchemaSource {
    pub path: String,
    pub content: String,
}

impl SchemaSource {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Outcome of [`generate_per_document`] and [`generate_from_paths`].
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Generated units keyed by file name.
    pub files: BTreeMap<String, String>,
    /// Inputs that declared nothing.
    pub skipped: Vec<String>,
    /// Inputs that failed, with the reason.
    pub failed: Vec<(String, GeneratorError)>,
}

impl GenerationReport {
    /// Returns `true` if no input failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Declarations of one invocation after cross-document deduplication.
struct MergedSchema<'a> {
    classes: Vec<&'a ClassDef>,
    enums: Vec<&'a EnumDef>,
    functions: Vec<FunctionPlan<'a>>,
    ctx: TypeContext,
}

impl<'a> MergedSchema<'a> {
    /// Walks documents in order. The first declaration of a generated type
    /// name wins; later ones are skipped with a warning.
    fn collect(documents: &'a [SchemaDocument]) -> Self {
        let mut ctx = TypeContext::new();
        let mut classes = Vec::new();
        let mut enums = Vec::new();
        let mut functions: Vec<&FunctionDef> = Vec::new();

        for document in documents {
            for class in &document.classes {
                if declare_type(&mut ctx, &class.name, &document.path, "class") {
                    classes.push(class);
                }
            }
            for def in &document.enums {
                if declare_type(&mut ctx, &def.name, &document.path, "enum") {
                    enums.push(def);
                }
            }
            functions.extend(document.functions.iter());
        }

        let functions = plan_functions(&functions, &ctx);
        Self {
            classes,
            enums,
            functions,
            ctx,
        }
    }

    fn has_types(&self) -> bool {
        !self.classes.is_empty() || !self.enums.is_empty()
    }

    /// Returns `true` if any function signature mentions a declared type.
    fn functions_use_types(&self) -> bool {
        self.functions.iter().any(|plan| {
            self.ctx.references_declared(&plan.return_type)
                || plan
                    .function
                    .parameters
                    .iter()
                    .any(|p| self.ctx.references_declared(&TypeExpr::parse(&p.type_expr)))
        })
    }
}

/// Registers a class or enum. A declaration whose generated name would shadow
/// the client struct gets a `_` suffix.
fn declare_type(ctx: &mut TypeContext, name: &str, path: &str, kind: &str) -> bool {
    let mut generated = type_name(name);
    if generated == CLIENT_STRUCT {
        generated.push('_');
        warn!(
            kind,
            name,
            path,
            generated = %generated,
            "renaming declaration that collides with the client struct"
        );
    }
    if ctx.is_declared(name) || ctx.has_generated(&generated) {
        warn!(
            kind,
            name,
            path,
            generated = %generated,
            "skipping declaration whose type name is already taken"
        );
        return false;
    }
    ctx.declare(name, generated)
}

/// Generates both units for all `documents` under `namespace`.
///
/// Returns a map from file name (`baml_types.rs`, `baml_client.rs`) to
/// formatted source. The map is empty when the documents declare nothing.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the emitted code does not
/// parse, which indicates a generator bug.
pub fn generate(
    documents: &[SchemaDocument],
    namespace: &str,
) -> Result<BTreeMap<String, String>, GeneratorError> {
    generate_units(documents, namespace, &UnitNames::for_stem(DEFAULT_STEM))
}

/// Generates both units for one document, naming them after its file stem.
///
/// ## Errors
///
/// Same as [`generate`].
pub fn generate_for_document(
    document: &SchemaDocument,
    namespace: &str,
) -> Result<BTreeMap<String, String>, GeneratorError> {
    let names = UnitNames::for_stem(&document_stem(&document.path));
    generate_units(std::slice::from_ref(document), namespace, &names)
}

/// Parses and generates each source on its own.
///
/// Sources that declare nothing are skipped. Sources whose stems collide get
/// a numeric suffix (`resume`, `resume_2`). A failing source is recorded in
/// the report and does not stop the others.
pub fn generate_per_document(sources: &[SchemaSource], namespace: &str) -> GenerationReport {
    let mut report = GenerationReport::default();
    let mut used_stems = HashSet::new();

    for source in sources {
        let document = parse(&source.content, &source.path);
        if document.is_empty() {
            info!(path = %source.path, "skipping schema with no declarations");
            report.skipped.push(source.path.clone());
            continue;
        }

        let stem = unique_stem(&document_stem(&source.path), &mut used_stems);
        let names = UnitNames::for_stem(&stem);
        match generate_units(std::slice::from_ref(&document), namespace, &names) {
            Ok(files) => {
                debug!(path = %source.path, stem = %stem, "generated units");
                report.files.extend(files);
            }
            Err(e) => {
                warn!(path = %source.path, error = %e, "generation failed");
                report.failed.push((source.path.clone(), e));
            }
        }
    }

    report
}

/// Reads every input as a schema source.
///
/// A file that cannot be read is returned as a `GeneratorError::ReadError`
/// next to its path and does not stop the others.
pub fn read_sources<P: AsRef<Path>>(
    inputs: &[P],
) -> (Vec<SchemaSource>, Vec<(String, GeneratorError)>) {
    let mut sources = Vec::with_capacity(inputs.len());
    let mut failed = Vec::new();

    for input in inputs {
        let path = input.as_ref().display().to_string();
        match fs::read_to_string(input) {
            Ok(content) => {
                debug!(path = %path, bytes = content.len(), "read schema file");
                sources.push(SchemaSource::new(path, content));
            }
            Err(source) => {
                warn!(path = %path, error = %source, "failed to read schema file");
                failed.push((path.clone(), GeneratorError::ReadError { path, source }));
            }
        }
    }

    (sources, failed)
}

/// Reads and generates every input, either per document or merged into one
/// pair of units.
///
/// Read failures are listed first in `failed`, in input order, followed by
/// generation failures.
pub fn generate_from_paths<P: AsRef<Path>>(
    inputs: &[P],
    namespace: &str,
    merged: bool,
) -> GenerationReport {
    let (sources, mut failed) = read_sources(inputs);
    info!(inputs = sources.len(), "read schema files");

    let mut report = if merged {
        generate_merged(&sources, namespace)
    } else {
        generate_per_document(&sources, namespace)
    };
    failed.append(&mut report.failed);
    report.failed = failed;
    report
}

fn generate_merged(sources: &[SchemaSource], namespace: &str) -> GenerationReport {
    let mut report = GenerationReport::default();
    let documents: Vec<_> = sources.iter().map(|s| parse(&s.content, &s.path)).collect();
    for document in documents.iter().filter(|d| d.is_empty()) {
        info!(path = %document.path, "skipping schema with no declarations");
        report.skipped.push(document.path.clone());
    }
    match generate(&documents, namespace) {
        Ok(files) => report.files = files,
        Err(e) => report.failed.push(("<merged>".to_string(), e)),
    }
    report
}

/// snake_case file stem of `path`, or [`DEFAULT_STEM`].
pub fn document_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| snake_name(stem, DEFAULT_STEM))
        .unwrap_or_else(|| DEFAULT_STEM.to_string())
}

fn unique_stem(base: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = base.to_string();
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{base}_{n}");
        n += 1;
    }
    candidate
}

fn generate_units(
    documents: &[SchemaDocument],
    namespace: &str,
    names: &UnitNames,
) -> Result<BTreeMap<String, String>, GeneratorError> {
    let mut files = BTreeMap::new();
    if documents.iter().all(SchemaDocument::is_empty) {
        return Ok(files);
    }

    let segments = namespace_segments(namespace);
    let merged = MergedSchema::collect(documents);

    let types_tokens = assemble_types_module(&merged, &segments, names);
    let client_tokens = assemble_client_module(&merged, &segments, names);

    files.insert(names.types_file(), format_code(&validate_code(&types_tokens)?));
    files.insert(names.client_file(), format_code(&validate_code(&client_tokens)?));
    Ok(files)
}

/// Assembles the types unit: module docs, then classes, then enums.
fn assemble_types_module(
    merged: &MergedSchema<'_>,
    namespace: &[String],
    names: &UnitNames,
) -> TokenStream {
    let items = merged
        .classes
        .iter()
        .map(|c| format!("`{}` (class)", merged.ctx.resolve(&c.name)))
        .chain(
            merged
                .enums
                .iter()
                .map(|e| format!("`{}` (enum)", merged.ctx.resolve(&e.name))),
        );
    let module_docs = ModuleDocBuilder::new(UnitKind::Types, namespace, &names.types_module)
        .items(items)
        .build();

    let classes: TokenStream = merged
        .classes
        .iter()
        .map(|class| generate_class(class, &merged.ctx))
        .collect();
    let enums: TokenStream = merged
        .enums
        .iter()
        .map(|def| generate_enum(def, &merged.ctx))
        .collect();

    quote! {
        #module_docs

        #classes

        #enums
    }
}

/// Assembles the client unit: module docs, the types import, parameter
/// structs and `BamlClient`.
fn assemble_client_module(
    merged: &MergedSchema<'_>,
    namespace: &[String],
    names: &UnitNames,
) -> TokenStream {
    let items = merged
        .functions
        .iter()
        .map(|plan| format!("`{}` (`{}`)", plan.function.name, plan.params_ident))
        .chain(std::iter::once("`BamlClient`".to_string()));
    let module_docs = ModuleDocBuilder::new(UnitKind::Client, namespace, &names.client_module)
        .items(items)
        .build();

    let types_import = if merged.has_types() && merged.functions_use_types() {
        types_import(namespace, &names.types_module)
    } else {
        quote! {}
    };

    let params: TokenStream = merged
        .functions
        .iter()
        .map(|plan| generate_params_struct(plan, &merged.ctx))
        .collect();
    let client = generate_client(&merged.functions, &merged.ctx);

    quote! {
        #module_docs

        #types_import

        #params

        #client
    }
}

/// `use crate::<namespace>::<types_module>::*;`, or `use super::...` when
/// there is no namespace.
fn types_import(namespace: &[String], types_module: &str) -> TokenStream {
    let module = ident(types_module);
    if namespace.is_empty() {
        return quote! { use super::#module::*; };
    }
    let segments = namespace.iter().map(|s| ident(s));
    quote! { use crate::#(#segments::)*#module::*; }
}

/// Validates generated code using syn.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the code fails to parse.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {e}")))
}

/// Formats generated code using prettyplease, prepending an auto-generated
/// notice as a regular comment.
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!(
        "// This code was automatically generated by baml-gen. Do not edit manually.\n\n{formatted}"
    )
}

/// Writes content to a file atomically using temp file + rename.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if parent directories cannot be
/// created, the temp file cannot be written or the rename fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("rs.tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Writes generated units into `output_dir`, or prints them when `dry_run`
/// is set.
///
/// The output directory is created if needed, but its parent must exist so
/// that a mistyped path does not silently create a new tree.
///
/// ## Returns
///
/// The paths written, in file name order (empty for a dry run).
///
/// ## Errors
///
/// Returns an error if:
/// - `output_dir` exists and is not a directory
/// - neither `output_dir` nor its parent exists
/// - a file cannot be written
pub fn write_units(
    files: &BTreeMap<String, String>,
    output_dir: &Path,
    dry_run: bool,
) -> Result<Vec<PathBuf>, GeneratorError> {
    if dry_run {
        for (filename, content) in files {
            println!("=== {filename} ===\n{content}\n");
        }
        return Ok(Vec::new());
    }

    if output_dir.exists() && !output_dir.is_dir() {
        return Err(GeneratorError::ConfigError(format!(
            "output path '{}' is not a directory",
            output_dir.display()
        )));
    }
    if !output_dir.exists()
        && let Some(parent) = output_dir.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        return Err(GeneratorError::OutputDirNotFound(parent.display().to_string()));
    }

    let mut written = Vec::with_capacity(files.len());
    for (filename, content) in files {
        let path = output_dir.join(filename);
        write_atomic(&path, content)?;
        written.push(path);
    }
    Ok(written)
}
