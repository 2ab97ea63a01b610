use serde_json::Value;

use crate::avro::{Enum, Field, NamedType, Primitive, Record, TypeDescriptor};
use crate::common::names::strip_namespace_prefix;
use crate::error::GenerateError;
use crate::generator::collector::Collector;

/// Resolve an Avro type node to a Python type expression.
///
/// Records the `typing` constructs and named imports the expression needs
/// on `collector`.
pub fn resolve(
    node: &Value,
    collector: &mut Collector,
    namespace_prefix: &str,
) -> Result<String, GenerateError> {
    let ty = descriptor(node, namespace_prefix)?;
    Ok(collector.render(&ty))
}

/// Translate an Avro type node into a [`TypeDescriptor`].
///
/// - primitive names map through the primitive table;
/// - a one-member union unwraps, a two-member union with exactly one `null`
///   becomes `Optional`, any other union keeps its order;
/// - `record`/`enum` objects resolve through their (qualified) name, `map`
///   and `array` through their value/item type;
/// - a dotted string is a named reference with `namespace_prefix` removed.
pub fn descriptor(node: &Value, namespace_prefix: &str) -> Result<TypeDescriptor, GenerateError> {
    match node {
        Value::String(name) => {
            if let Some(primitive) = Primitive::from_avro_name(name) {
                Ok(TypeDescriptor::Primitive(primitive))
            } else if name.contains('.') {
                Ok(TypeDescriptor::Named(
                    strip_namespace_prefix(name, namespace_prefix).to_string(),
                ))
            } else {
                Err(GenerateError::UnknownPrimitiveType(name.clone()))
            }
        }
        Value::Array(members) => {
            let resolved = members
                .iter()
                .map(|member| descriptor(member, namespace_prefix))
                .collect::<Result<Vec<_>, _>>()?;
            match resolved.as_slice() {
                [] => Err(GenerateError::UnresolvableType(node.clone())),
                [only] => Ok(only.clone()),
                [a, b] if a.is_null() != b.is_null() => {
                    let other = if a.is_null() { b } else { a };
                    Ok(TypeDescriptor::Optional(Box::new(other.clone())))
                }
                _ => Ok(TypeDescriptor::Union(resolved)),
            }
        }
        Value::Object(obj) => {
            let Some(kind) = obj.get("type").and_then(Value::as_str) else {
                return Err(GenerateError::UnresolvableType(node.clone()));
            };
            let compound = || GenerateError::UnresolvableCompoundType(node.clone());
            match kind {
                "record" | "error" | "enum" => {
                    descriptor(obj.get("name").ok_or_else(compound)?, namespace_prefix)
                }
                "map" => Ok(TypeDescriptor::Map(Box::new(descriptor(
                    obj.get("values").ok_or_else(compound)?,
                    namespace_prefix,
                )?))),
                "array" => Ok(TypeDescriptor::List(Box::new(descriptor(
                    obj.get("items").ok_or_else(compound)?,
                    namespace_prefix,
                )?))),
                other => Primitive::from_avro_name(other)
                    .map(TypeDescriptor::Primitive)
                    .ok_or_else(compound),
            }
        }
        _ => Err(GenerateError::UnresolvableType(node.clone())),
    }
}

/// Describe a qualified named schema (as produced by the schema loader).
///
/// Records and enums are supported; any other kind is
/// [`GenerateError::UnsupportedSchemaKind`].
pub fn describe_named(schema: &Value, namespace_prefix: &str) -> Result<NamedType, GenerateError> {
    let kind = schema.get("type").and_then(Value::as_str).unwrap_or_default();
    let qualified = schema
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| GenerateError::invalid("named schema without a `name`", schema))?;
    let name = strip_namespace_prefix(qualified, namespace_prefix).to_string();
    let doc = schema.get("doc").and_then(Value::as_str).map(str::to_string);

    match kind {
        "record" | "error" => {
            let raw_fields = schema
                .get("fields")
                .and_then(Value::as_array)
                .ok_or_else(|| GenerateError::invalid("record without `fields`", schema))?;
            let mut fields = Vec::with_capacity(raw_fields.len());
            for raw in raw_fields {
                let field_name = raw
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| GenerateError::invalid("field without a `name`", raw))?;
                let field_type = raw
                    .get("type")
                    .ok_or_else(|| GenerateError::invalid("field without `type`", raw))?;
                fields.push(Field {
                    name: field_name.to_string(),
                    ty: descriptor(field_type, namespace_prefix)?,
                    default: raw.get("default").cloned(),
                    doc: raw.get("doc").and_then(Value::as_str).map(str::to_string),
                });
            }
            Ok(NamedType::Record(Record { name, fields, doc }))
        }
        "enum" => {
            let symbols = schema
                .get("symbols")
                .and_then(Value::as_array)
                .ok_or_else(|| GenerateError::invalid("enum without `symbols`", schema))?
                .iter()
                .map(|s| {
                    s.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| GenerateError::invalid("enum symbol is not a string", s))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(NamedType::Enum(Enum { name, symbols, doc }))
        }
        other => Err(GenerateError::UnsupportedSchemaKind {
            name,
            kind: other.to_string(),
        }),
    }
}
