//! Structural conversion between typed values and plain JSON data.
//!
//! [`to_plain`] flattens a [`Value`] into nested JSON objects, arrays and
//! scalars. [`from_plain`] rebuilds a [`Value`] from plain data, driven by a
//! [`TypeDescriptor`] and the [`Catalog`] of named types. Both are pure and
//! may be called from any number of threads.

pub mod value;

pub use value::{RecordValue, Value};

use serde_json::{Map, Number, Value as Plain};

use crate::avro::{NamedType, Primitive, Record, TypeDescriptor};
use crate::catalog::Catalog;
use crate::error::ConvertError;

/// Flatten a typed value into plain JSON data.
///
/// Records become objects keyed by field name in declaration order, enum
/// symbols become strings. Non-finite floats have no JSON form and become
/// `null`.
pub fn to_plain(value: &Value) -> Plain {
    match value {
        Value::Null => Plain::Null,
        Value::Boolean(b) => Plain::Bool(*b),
        Value::Int(i) => Plain::Number((*i).into()),
        Value::Float(f) => Number::from_f64(*f).map_or(Plain::Null, Plain::Number),
        Value::String(s) | Value::Enum(s) => Plain::String(s.clone()),
        Value::List(items) => Plain::Array(items.iter().map(to_plain).collect()),
        Value::Map(entries) => Plain::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), to_plain(v)))
                .collect(),
        ),
        Value::Record(record) => Plain::Object(
            record
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), to_plain(v)))
                .collect(),
        ),
    }
}

/// How strictly JSON numbers are matched against `float`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Match {
    /// `float` only takes numbers that carry a fractional representation.
    Exact,
    /// `float` takes any number.
    Coercing,
}

/// Rebuild a typed value of type `ty` from plain data.
///
/// JSON `null` is the only absence marker: `Optional` unwraps any other
/// value, including `0`, `""`, `false` and empty collections.
///
/// Unions first look for an alternative that takes the value exactly, trying
/// enum references ahead of the rest so a matching symbol stays an enum, and
/// an integer is never widened to `float` while an `int` alternative could
/// take it. Failing that, the first alternative that converts wins.
pub fn from_plain(ty: &TypeDescriptor, plain: &Plain, catalog: &Catalog) -> Result<Value, ConvertError> {
    convert(ty, plain, catalog, Match::Coercing)
}

/// Rebuild a typed value of the named record or enum `name`.
pub fn from_plain_named(name: &str, plain: &Plain, catalog: &Catalog) -> Result<Value, ConvertError> {
    convert_named(name, plain, catalog, Match::Coercing)
}

fn convert(
    ty: &TypeDescriptor,
    plain: &Plain,
    catalog: &Catalog,
    mode: Match,
) -> Result<Value, ConvertError> {
    match ty {
        TypeDescriptor::Primitive(p) => from_primitive(*p, plain, mode),
        TypeDescriptor::Optional(inner) => match plain {
            Plain::Null => Ok(Value::Null),
            _ => convert(inner, plain, catalog, mode),
        },
        TypeDescriptor::Union(alternatives) => from_union(alternatives, plain, catalog, mode),
        TypeDescriptor::List(item) => match plain {
            Plain::Array(items) => items
                .iter()
                .map(|v| convert(item, v, catalog, mode))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            _ => Err(ConvertError::mismatch(ty.to_string(), plain)),
        },
        TypeDescriptor::Map(value_ty) => match plain {
            Plain::Object(entries) => entries
                .iter()
                .map(|(k, v)| Ok((k.clone(), convert(value_ty, v, catalog, mode)?)))
                .collect::<Result<_, ConvertError>>()
                .map(Value::Map),
            _ => Err(ConvertError::mismatch(ty.to_string(), plain)),
        },
        TypeDescriptor::Named(name) => convert_named(name, plain, catalog, mode),
    }
}

fn from_union(
    alternatives: &[TypeDescriptor],
    plain: &Plain,
    catalog: &Catalog,
    mode: Match,
) -> Result<Value, ConvertError> {
    let names_enum = |alt: &&TypeDescriptor| {
        matches!(alt, TypeDescriptor::Named(name) if catalog.enumeration(name).is_some())
    };
    let (enums, others): (Vec<_>, Vec<_>) = alternatives.iter().partition(names_enum);

    let exact = enums
        .iter()
        .chain(&others)
        .find_map(|alt| convert(alt, plain, catalog, Match::Exact).ok());
    let converted = match (exact, mode) {
        (Some(value), _) => Some(value),
        (None, Match::Coercing) => alternatives
            .iter()
            .find_map(|alt| convert(alt, plain, catalog, Match::Coercing).ok()),
        (None, Match::Exact) => None,
    };
    converted.ok_or_else(|| ConvertError::UnionConversionFailure {
        value: plain.clone(),
        alternatives: alternatives.iter().map(ToString::to_string).collect(),
    })
}

fn convert_named(
    name: &str,
    plain: &Plain,
    catalog: &Catalog,
    mode: Match,
) -> Result<Value, ConvertError> {
    match catalog.get(name) {
        Some(NamedType::Record(record)) => match plain {
            Plain::Object(entries) => from_record(record, entries, catalog, mode).map(Value::Record),
            _ => Err(ConvertError::mismatch(name, plain)),
        },
        Some(NamedType::Enum(e)) => match plain {
            Plain::String(symbol) if e.symbols.contains(symbol) => Ok(Value::Enum(symbol.clone())),
            Plain::String(symbol) => Err(ConvertError::UnknownEnumSymbol {
                name: e.name.clone(),
                symbol: symbol.clone(),
            }),
            _ => Err(ConvertError::mismatch(name, plain)),
        },
        None => Err(ConvertError::UnsupportedFieldType(name.to_string())),
    }
}

fn from_primitive(primitive: Primitive, plain: &Plain, mode: Match) -> Result<Value, ConvertError> {
    let converted = match (primitive, plain) {
        (Primitive::Null, Plain::Null) => Some(Value::Null),
        (Primitive::Boolean, Plain::Bool(b)) => Some(Value::Boolean(*b)),
        (Primitive::Integer, Plain::Number(n)) => n.as_i64().map(Value::Int),
        (Primitive::Float, Plain::Number(n)) if mode == Match::Coercing || n.is_f64() => {
            n.as_f64().map(Value::Float)
        }
        (Primitive::String, Plain::String(s)) => Some(Value::String(s.clone())),
        _ => None,
    };
    converted.ok_or_else(|| ConvertError::mismatch(primitive.python_name(), plain))
}

fn from_record(
    record: &Record,
    entries: &Map<String, Plain>,
    catalog: &Catalog,
    mode: Match,
) -> Result<RecordValue, ConvertError> {
    if let Some(unknown) = entries.keys().find(|k| record.field(k).is_none()) {
        return Err(ConvertError::UnknownField {
            record: record.name.clone(),
            field: unknown.clone(),
        });
    }

    let mut value = RecordValue::new(&record.name);
    for field in &record.fields {
        let converted = match (entries.get(&field.name), &field.default) {
            (Some(plain), _) | (None, Some(plain)) => convert(&field.ty, plain, catalog, mode),
            (None, None) if field.ty.admits_null() => Ok(Value::Null),
            (None, None) => {
                return Err(ConvertError::MissingField {
                    record: record.name.clone(),
                    field: field.name.clone(),
                })
            }
        };
        let converted = converted.map_err(|source| ConvertError::Field {
            record: record.name.clone(),
            field: field.name.clone(),
            source: Box::new(source),
        })?;
        value.fields.insert(field.name.clone(), converted);
    }
    Ok(value)
}
