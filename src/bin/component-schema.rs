//! Component Schema CLI
//!
//! Generates a component package schema from a host package's type graph.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use component_schema::{generate, load_graph_auto, GenerateOptions, PackageSchema};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "component-schema")]
#[command(about = "Generate a component package schema from annotated host types")]
#[command(version)]
struct Cli {
    /// Name of the schema package to emit
    package_name: String,

    /// Type graph of the source package: file path or URL (http:// or https://)
    graph: String,

    /// Struct-tag key holding property annotations
    #[arg(long, default_value = component_schema::DEFAULT_TAG_KEY)]
    tag_key: String,

    /// Output file (stdout if not specified)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// Log to stderr, filtered by `RUST_LOG` (warnings by default).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), u8> {
    let graph = load_graph_auto(&cli.graph).map_err(|e| {
        eprintln!("Error: loading {}: {}", cli.graph, e);
        e.exit_code() as u8
    })?;

    let options = GenerateOptions::new(cli.package_name).tag_key(cli.tag_key);
    let schema = generate(&graph, &options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let json_output = serialize(&schema, cli.pretty).map_err(|e| {
        eprintln!("Error: serializing schema to JSON: {}", e);
        2u8
    })?;

    match cli.output {
        Some(path) => write_output(&path, &json_output),
        None => {
            println!("{}", json_output);
            Ok(())
        }
    }
}

fn serialize(schema: &PackageSchema, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(schema)
    } else {
        serde_json::to_string(schema)
    }
}

fn write_output(path: &Path, json_output: &str) -> Result<(), u8> {
    std::fs::write(path, json_output).map_err(|e| {
        eprintln!("Error writing to {}: {}", path.display(), e);
        3u8
    })
}
