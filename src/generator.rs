pub mod collector;
pub mod emitter;
pub mod postprocess;
pub mod resolver;
pub mod scaffold;

pub use collector::Collector;
pub use emitter::{emit, OutputType};
pub use resolver::{descriptor, resolve};

use serde_json::Value;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::catalog::Catalog;
use crate::error::GenerateError;
use crate::schema::{load_schema_ordered, Manifest, ParsedSchema};
use postprocess::{run_formatter, DEFAULT_FORMATTER};
use scaffold::ensure_package_markers;

/// Settings for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub output_type: OutputType,
    /// Stripped from every qualified name that starts with it.
    pub namespace_prefix: String,
    pub output_dir: PathBuf,
    /// Formatter command run per namespace root; `None` skips formatting.
    pub formatter: Option<String>,
    /// Where to write the descriptor table, if anywhere.
    pub descriptor_path: Option<PathBuf>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            output_type: OutputType::Dataclass,
            namespace_prefix: String::new(),
            output_dir: PathBuf::from("."),
            formatter: Some(DEFAULT_FORMATTER.to_string()),
            descriptor_path: None,
        }
    }
}

/// What a generation run produced.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Every file written, in emission order.
    pub written: Vec<PathBuf>,
    /// First namespace segment of every emitted type.
    pub namespace_roots: BTreeSet<String>,
    /// Descriptor table of every emitted type.
    pub catalog: Catalog,
}

impl GenerationReport {
    fn record(&mut self, emitted: emitter::Emitted) {
        if let Some(root) = emitted.namespace_root {
            self.namespace_roots.insert(root);
        }
        self.written.push(emitted.path);
        self.catalog.insert(emitted.named);
    }
}

/// Load every schema set of `manifest`, emit all of their named types, then
/// scaffold packages and run the formatter.
///
/// The first failure aborts the run.
pub fn generate(manifest: &Manifest, options: &GenerateOptions) -> Result<GenerationReport, GenerateError> {
    let mut report = GenerationReport::default();
    for (name, locations) in manifest {
        tracing::info!(schema_set = %name, files = locations.len(), "generating");
        let parsed = load_schema_ordered(locations)?;
        generate_schema(&parsed, options, &mut report)?;
    }
    finish(&report, options)?;
    Ok(report)
}

/// Emit every named type of one parsed schema set into `report`.
///
/// Registry entries come first, then the root schema. Each entry writes its
/// own file only, so their relative order does not matter.
pub fn generate_schema(
    parsed: &ParsedSchema,
    options: &GenerateOptions,
    report: &mut GenerationReport,
) -> Result<(), GenerateError> {
    let root_name = parsed.root_name();
    for (qualified, schema) in &parsed.named {
        if Some(qualified.as_str()) == root_name {
            continue;
        }
        report.record(emit_one(schema, options)?);
    }

    match &parsed.schema {
        // A union document: its members are all in the registry already.
        Value::Array(_) => Ok(()),
        root @ Value::Object(_) => {
            report.record(emit_one(root, options)?);
            Ok(())
        }
        other => Err(GenerateError::UnsupportedSchemaKind {
            name: "<root>".to_string(),
            kind: other.as_str().map_or_else(|| other.to_string(), str::to_string),
        }),
    }
}

fn emit_one(schema: &Value, options: &GenerateOptions) -> Result<emitter::Emitted, GenerateError> {
    emit(
        schema,
        options.output_type,
        &options.namespace_prefix,
        &options.output_dir,
    )
}

/// Scaffold package markers, run the formatter and write the descriptor table.
pub fn finish(report: &GenerationReport, options: &GenerateOptions) -> Result<(), GenerateError> {
    ensure_package_markers(&options.output_dir, &report.namespace_roots)?;

    if let Some(formatter) = &options.formatter {
        for root in &report.namespace_roots {
            run_formatter(formatter, &options.output_dir.join(root))?;
        }
    }

    if let Some(path) = &options.descriptor_path {
        report.catalog.write(path)?;
        tracing::info!(path = %path.display(), types = report.catalog.len(), "wrote descriptor table");
    }
    Ok(())
}
