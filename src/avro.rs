use serde::{Deserialize, Serialize};
use std::fmt;

/// Avro primitive kinds after folding (`long` → `Integer`, `double` → `Float`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    String,
    Integer,
    Boolean,
    Float,
    Null,
}

impl Primitive {
    /// Look up an Avro primitive type name.
    pub fn from_avro_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Primitive::String),
            "int" | "long" => Some(Primitive::Integer),
            "boolean" => Some(Primitive::Boolean),
            "float" | "double" => Some(Primitive::Float),
            "null" => Some(Primitive::Null),
            _ => None,
        }
    }

    /// The Python spelling of this primitive.
    pub fn python_name(self) -> &'static str {
        match self {
            Primitive::String => "str",
            Primitive::Integer => "int",
            Primitive::Boolean => "bool",
            Primitive::Float => "float",
            Primitive::Null => "None",
        }
    }
}

/// A resolved field type.
///
/// Both the resolver (which renders it as a Python type expression) and the
/// structural converter (which walks it to rebuild values) match over this
/// closed set of variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "lowercase")]
pub enum TypeDescriptor {
    Primitive(Primitive),
    /// Two-member union where exactly one member is `null`.
    Optional(Box<TypeDescriptor>),
    Union(Vec<TypeDescriptor>),
    List(Box<TypeDescriptor>),
    /// Keys are always strings.
    Map(Box<TypeDescriptor>),
    /// Qualified name of a record or enum, namespace prefix already stripped.
    Named(String),
}

impl TypeDescriptor {
    pub const NULL: TypeDescriptor = TypeDescriptor::Primitive(Primitive::Null);

    pub fn is_null(&self) -> bool {
        matches!(self, TypeDescriptor::Primitive(Primitive::Null))
    }

    /// Whether a JSON `null` is an acceptable value for this type.
    pub fn admits_null(&self) -> bool {
        match self {
            TypeDescriptor::Primitive(Primitive::Null) | TypeDescriptor::Optional(_) => true,
            TypeDescriptor::Union(alternatives) => alternatives.iter().any(|t| t.admits_null()),
            _ => false,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(p) => f.write_str(p.python_name()),
            TypeDescriptor::Optional(inner) => write!(f, "Optional[{inner}]"),
            TypeDescriptor::Union(alternatives) => {
                f.write_str("Union[")?;
                for (i, alt) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{alt}")?;
                }
                f.write_str("]")
            }
            TypeDescriptor::List(item) => write!(f, "List[{item}]"),
            TypeDescriptor::Map(value) => write!(f, "Dict[str, {value}]"),
            TypeDescriptor::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Present even when the default is JSON `null`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub default: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Record {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    pub symbols: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// A named schema: the unit of emission and of catalog lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NamedType {
    Record(Record),
    Enum(Enum),
}

impl NamedType {
    pub fn name(&self) -> &str {
        match self {
            NamedType::Record(r) => &r.name,
            NamedType::Enum(e) => &e.name,
        }
    }
}
