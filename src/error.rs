//! Error types for schema generation and structural conversion.

use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading schemas or emitting declarations.
///
/// Any of these aborts the whole generation run.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// A bare type name that is neither an Avro primitive nor a dotted reference
    #[error("unknown primitive type `{0}`")]
    UnknownPrimitiveType(String),

    /// A `{"type": ...}` object whose kind the resolver does not handle
    #[error("cannot resolve compound type {0}")]
    UnresolvableCompoundType(Value),

    /// A schema node of no recognisable shape
    #[error("cannot resolve type {0}")]
    UnresolvableType(Value),

    /// A named schema that is neither a record nor an enum
    #[error("unsupported schema kind `{kind}` for `{name}`")]
    UnsupportedSchemaKind { name: String, kind: String },

    /// A schema document that is structurally broken (missing `name`, bad `fields`, ...)
    #[error("invalid schema: {message} in {fragment}")]
    InvalidSchema { message: String, fragment: Value },

    /// IO error
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON error
    #[error("invalid JSON in {location}: {source}")]
    Json {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// Ordering manifest error
    #[error("invalid manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// HTTP fetch error
    #[error("failed to fetch {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    /// The formatting post-process failed
    #[error("formatter `{command}` failed on {}: {message}", .path.display())]
    Formatter {
        command: String,
        path: PathBuf,
        message: String,
    },
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>, fragment: &Value) -> Self {
        GenerateError::InvalidSchema {
            message: message.into(),
            fragment: fragment.clone(),
        }
    }
}

/// Failures while rebuilding a typed value from plain data.
///
/// Scoped to a single conversion call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// Every alternative of a union rejected the value
    #[error("no alternative of [{}] accepts {value}", .alternatives.join(", "))]
    UnionConversionFailure {
        value: Value,
        alternatives: Vec<String>,
    },

    /// The declared type is not one the converter knows how to build
    #[error("unsupported field type `{0}`")]
    UnsupportedFieldType(String),

    /// The plain value has the wrong shape for the declared type
    #[error("expected {expected}, found {value}")]
    TypeMismatch { expected: String, value: Value },

    /// A required field is absent and has no default
    #[error("missing field `{field}` of `{record}`")]
    MissingField { record: String, field: String },

    /// The plain mapping carries a key the record does not declare
    #[error("unknown field `{field}` for `{record}`")]
    UnknownField { record: String, field: String },

    /// An enum value outside the declared symbols
    #[error("`{symbol}` is not a symbol of `{name}`")]
    UnknownEnumSymbol { name: String, symbol: String },

    /// Context for a failure inside a record field
    #[error("{record}.{field}: {source}")]
    Field {
        record: String,
        field: String,
        #[source]
        source: Box<ConvertError>,
    },
}

impl ConvertError {
    pub(crate) fn mismatch(expected: impl Into<String>, value: &Value) -> Self {
        ConvertError::TypeMismatch {
            expected: expected.into(),
            value: value.clone(),
        }
    }
}
