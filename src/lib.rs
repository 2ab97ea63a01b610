//! # avrogen
//!
//! Generate Python type declarations from [Apache Avro](https://avro.apache.org/)
//! schemas, and convert values of those types to and from plain data.
//!
//! ## Features
//!
//! - Records become `@dataclass` or `TypedDict` classes, enums become
//!   `Literal[...]` aliases
//! - Maps unions, optionals, arrays, maps and named references onto `typing`
//! - One file per named schema, placed by namespace, with cross-schema imports
//! - Self-referencing records use quoted forward references
//! - Ordered multi-file schema sets through a TOML manifest
//! - A descriptor table of every generated type drives [`convert`]
//! - CLI tool `avrogen` for batch generation
//!
//! ## Example (Programmatic Usage)
//!
//! ```no_run
//! use avrogen::generator::{generate, GenerateOptions, OutputType};
//! use avrogen::schema::manifest_from_files;
//!
//! let manifest = manifest_from_files(&["schemas/weather.avsc"]);
//! let options = GenerateOptions {
//!     output_type: OutputType::Dataclass,
//!     namespace_prefix: "com.example.".to_string(),
//!     output_dir: "generated".into(),
//!     formatter: None,
//!     descriptor_path: None,
//! };
//! let report = generate(&manifest, &options).unwrap();
//! println!("wrote {} files", report.written.len());
//! ```
//!
//! ## Example (Round trip)
//!
//! ```
//! use avrogen::catalog::Catalog;
//! use avrogen::convert::{from_plain_named, to_plain};
//! use avrogen::schema::parse_schema;
//! use serde_json::json;
//!
//! let parsed = parse_schema(&json!({
//!     "type": "record", "name": "my.test.Weather",
//!     "fields": [
//!         {"name": "station", "type": "string"},
//!         {"name": "temp", "type": ["null", "int"]}
//!     ]
//! })).unwrap();
//! let catalog = Catalog::from_parsed(&parsed, "").unwrap();
//!
//! let plain = json!({"station": "KSEA", "temp": 12});
//! let value = from_plain_named("my.test.Weather", &plain, &catalog).unwrap();
//! assert_eq!(to_plain(&value), plain);
//! ```
//!
//! ## Example (CLI)
//!
//! ```bash
//! avrogen weather.avsc --prefix com.example. --output-dir generated
//! ```
//!
//! ## Crate Layout
//!
//! - [`avro`]: Type descriptors and named types (`TypeDescriptor`, `Record`, `Enum`)
//! - [`common`]: Name handling and schema traversal helpers
//! - [`schema`]: Loading and qualifying schema documents
//! - [`generator`]: Resolver, emitter and the generation driver
//! - [`catalog`]: Descriptor table of generated types
//! - [`convert`]: Typed value ⇄ plain data conversion
//! - [`error`]: Error types
//!
//! The CLI binary is enabled with the `cli` feature.
pub mod avro;
pub mod catalog;
pub mod common;
pub mod convert;
pub mod error;
pub mod generator;
pub mod schema;
