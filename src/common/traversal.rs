use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::common::names::{fullname, is_avro_fullname, split_qualified};
use crate::error::GenerateError;

/// Schema kinds that carry a name and are registered as named types.
pub const NAMED_KINDS: [&str; 4] = ["record", "error", "enum", "fixed"];

/// Every Avro primitive type name, including the ones the resolver rejects.
pub const AVRO_PRIMITIVES: [&str; 8] = [
    "null", "boolean", "int", "long", "float", "double", "bytes", "string",
];

/// Registry of named schemas keyed by full name, in definition order.
pub type NamedSchemas = IndexMap<String, Value>;

/// Recursively qualify every name in an Avro schema and register named types.
///
/// Named types get their full name written back into `name` (and lose
/// `namespace`); bare references are qualified with the enclosing namespace.
/// Nested named types are registered before the type that contains them.
pub fn qualify_schema(
    schema: &Value,
    namespace: &str,
    named: &mut NamedSchemas,
) -> Result<Value, GenerateError> {
    match schema {
        Value::String(name) => Ok(Value::String(qualify_reference(name, namespace))),
        Value::Array(items) => items
            .iter()
            .map(|item| qualify_schema(item, namespace, named))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(obj) => match obj.get("type") {
            Some(Value::String(kind)) if NAMED_KINDS.contains(&kind.as_str()) => {
                qualify_named(obj, kind, namespace, named)
            }
            Some(Value::String(kind)) if kind == "array" || kind == "map" => {
                let key = if kind == "array" { "items" } else { "values" };
                let inner = obj
                    .get(key)
                    .ok_or_else(|| GenerateError::invalid(format!("{kind} without `{key}`"), schema))?;
                let mut out = obj.clone();
                out.insert(key.to_string(), qualify_schema(inner, namespace, named)?);
                Ok(Value::Object(out))
            }
            Some(inner @ (Value::Object(_) | Value::Array(_))) => {
                let mut out = obj.clone();
                out.insert("type".to_string(), qualify_schema(inner, namespace, named)?);
                Ok(Value::Object(out))
            }
            _ => Ok(schema.clone()),
        },
        _ => Ok(schema.clone()),
    }
}

fn qualify_reference(name: &str, namespace: &str) -> String {
    if AVRO_PRIMITIVES.contains(&name) {
        name.to_string()
    } else {
        fullname(name, namespace)
    }
}

fn qualify_named(
    obj: &Map<String, Value>,
    kind: &str,
    parent_namespace: &str,
    named: &mut NamedSchemas,
) -> Result<Value, GenerateError> {
    let node = Value::Object(obj.clone());
    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| GenerateError::invalid(format!("{kind} without a `name`"), &node))?;
    let namespace = obj
        .get("namespace")
        .and_then(Value::as_str)
        .unwrap_or(parent_namespace);
    let full = fullname(name, namespace);
    if !is_avro_fullname(&full) {
        return Err(GenerateError::invalid(format!("`{full}` is not a valid name"), &node));
    }
    let own_namespace = split_qualified(&full).0.to_string();

    let mut out = obj.clone();
    out.insert("name".to_string(), Value::String(full.clone()));
    out.remove("namespace");

    if kind == "record" || kind == "error" {
        let fields = obj
            .get("fields")
            .and_then(Value::as_array)
            .ok_or_else(|| GenerateError::invalid("record without `fields`", &node))?;
        let mut qualified_fields = Vec::with_capacity(fields.len());
        for field in fields {
            let field_type = field
                .get("type")
                .ok_or_else(|| GenerateError::invalid("field without `type`", field))?;
            let mut field_out = field.clone();
            field_out["type"] = qualify_schema(field_type, &own_namespace, named)?;
            qualified_fields.push(field_out);
        }
        out.insert("fields".to_string(), Value::Array(qualified_fields));
    }

    let qualified = Value::Object(out);
    if let Some(existing) = named.get(&full) {
        if existing != &qualified {
            return Err(GenerateError::invalid(format!("`{full}` is defined twice"), &qualified));
        }
    }
    tracing::trace!(name = %full, kind, "registered named schema");
    named.insert(full, qualified.clone());
    Ok(qualified)
}
