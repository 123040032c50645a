//! BAML Code Generator
//!
//! Generates typed Rust clients from BAML schema files.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use baml_gen::output::{GenerationReport, SchemaSource, generate_from_paths, read_sources, write_units};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// BAML code generator - transforms schema files into typed Rust clients
#[derive(Parser, Debug)]
#[command(name = "baml-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Schema files to generate code for
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Namespace the generated units are mounted under (e.g. "my_app.baml")
    #[arg(short, long, default_value = "baml_client")]
    namespace: String,

    /// Output directory for generated code
    #[arg(short, long, default_value = "src/baml_client")]
    output: PathBuf,

    /// Generate one pair of units for all inputs instead of one pair per file
    #[arg(long)]
    merged: bool,

    /// Print the parsed documents as JSON and exit
    #[arg(long)]
    dump_ir: bool,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Initialize tracing subscriber with verbosity-based filtering.
///
/// `RUST_LOG` takes precedence when set. Otherwise:
/// - 0: WARN
/// - 1: INFO
/// - 2: DEBUG
/// - 3+: TRACE
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
        .to_string(),
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.dump_ir {
        let (sources, failed) = read_sources(&cli.inputs);
        let report = GenerationReport {
            failed,
            ..Default::default()
        };
        return dump_ir(&sources, &report);
    }

    let report = generate_from_paths(&cli.inputs, &cli.namespace, cli.merged);

    if let Err(e) = write_units(&report.files, &cli.output, cli.dry_run) {
        print_failures(&report);
        eprintln!("{} {e}", "error:".red().bold());
        return ExitCode::FAILURE;
    }
    print_summary(&report, &cli.output, cli.dry_run);

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn dump_ir(sources: &[SchemaSource], report: &GenerationReport) -> ExitCode {
    let documents: Vec<_> = sources
        .iter()
        .map(|s| baml_define::parse(&s.content, &s.path))
        .collect();

    match serde_json::to_string_pretty(&documents) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("{} failed to serialize documents: {e}", "error:".red().bold());
            return ExitCode::FAILURE;
        }
    }

    print_failures(report);
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_summary(report: &GenerationReport, output: &Path, dry_run: bool) {
    if !dry_run {
        for filename in report.files.keys() {
            eprintln!(
                "{} {}",
                "generated".green().bold(),
                output.join(filename).display()
            );
        }
    }
    for path in &report.skipped {
        eprintln!("{} {path} (no declarations)", "skipped".yellow().bold());
    }
    print_failures(report);
}

fn print_failures(report: &GenerationReport) {
    for (path, error) in &report.failed {
        eprintln!("{} {path}: {error}", "failed".red().bold());
    }
}
