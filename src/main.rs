use std::path::PathBuf;

use avrogen::error::GenerateError;
use avrogen::generator::postprocess::DEFAULT_FORMATTER;
use avrogen::generator::{generate, GenerateOptions, OutputType};
use avrogen::schema::{manifest_from_files, read_manifest};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "avrogen", about = "Generate dataclasses or TypedDicts from avro schemas")]
struct Cli {
    /// File(s) to parse, use '-' for stdin
    #[arg(value_name = "FILE")]
    files: Vec<String>,

    /// TOML manifest of ordered schema sets; overrides FILE
    #[arg(short = 'o', long, value_name = "TOML")]
    ordered: Option<PathBuf>,

    /// Declaration style for records
    #[arg(long = "class-type", value_enum, default_value_t = OutputType::Dataclass)]
    class_type: OutputType,

    /// Do not run output files through the formatter
    #[arg(long, default_value_t = false)]
    no_black: bool,

    /// Formatter command run on each generated package
    #[arg(long, default_value = DEFAULT_FORMATTER)]
    formatter: String,

    /// Removes this prefix from namespaces that start with it
    #[arg(long, default_value = "")]
    prefix: String,

    /// Output location
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Also write the descriptor table of generated types as JSON
    #[arg(long, value_name = "PATH")]
    descriptors: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<(), GenerateError> {
    let manifest = match &cli.ordered {
        Some(path) => read_manifest(path)?,
        None => manifest_from_files(&cli.files),
    };
    let options = GenerateOptions {
        output_type: cli.class_type,
        namespace_prefix: cli.prefix,
        output_dir: cli.output_dir,
        formatter: (!cli.no_black).then_some(cli.formatter),
        descriptor_path: cli.descriptors,
    };
    let report = generate(&manifest, &options)?;
    tracing::info!(files = report.written.len(), "done");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
