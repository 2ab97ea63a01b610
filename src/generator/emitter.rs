use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::avro::{Enum, NamedType, Record};
use crate::common::names::{class_name, namespace_root, output_path};
use crate::error::GenerateError;
use crate::generator::collector::Collector;
use crate::generator::resolver::describe_named;

/// Extension of every emitted file.
pub const EXTENSION: &str = "py";

/// Declaration style for records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputType {
    /// `@dataclass` classes; schema defaults are kept.
    #[default]
    #[serde(rename = "dataclass")]
    #[cfg_attr(feature = "cli", value(name = "dataclass"))]
    Dataclass,
    /// `TypedDict` classes; defaults are dropped.
    #[serde(rename = "TypedDict")]
    #[cfg_attr(feature = "cli", value(name = "TypedDict"))]
    TypedDict,
}

impl OutputType {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputType::Dataclass => "dataclass",
            OutputType::TypedDict => "TypedDict",
        }
    }

    fn supports_defaults(self) -> bool {
        self == OutputType::Dataclass
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dataclass" => Ok(OutputType::Dataclass),
            "TypedDict" => Ok(OutputType::TypedDict),
            other => Err(format!("unknown output type `{other}`")),
        }
    }
}

/// Result of emitting one named schema.
#[derive(Debug, Clone)]
pub struct Emitted {
    pub path: PathBuf,
    pub named: NamedType,
    pub namespace_root: Option<String>,
}

/// Emit one qualified named schema into its file under `output_root`.
#[tracing::instrument(level = "debug", skip(schema, output_root), fields(name = ?schema.get("name")))]
pub fn emit(
    schema: &Value,
    output_type: OutputType,
    namespace_prefix: &str,
    output_root: &Path,
) -> Result<Emitted, GenerateError> {
    let named = describe_named(schema, namespace_prefix)?;
    emit_named(named, output_type, output_root)
}

/// Emit an already described named type.
pub fn emit_named(
    named: NamedType,
    output_type: OutputType,
    output_root: &Path,
) -> Result<Emitted, GenerateError> {
    let source = render_named(&named, output_type);
    let path = output_path(output_root, named.name(), EXTENSION);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| GenerateError::io(parent, e))?;
    }
    fs::write(&path, source).map_err(|e| GenerateError::io(&path, e))?;
    tracing::info!(name = named.name(), path = %path.display(), "wrote {output_type}");

    let namespace_root = namespace_root(named.name()).map(str::to_string);
    Ok(Emitted {
        path,
        named,
        namespace_root,
    })
}

/// Python source for a named type.
pub fn render_named(named: &NamedType, output_type: OutputType) -> String {
    match named {
        NamedType::Record(record) => render_record(record, output_type),
        NamedType::Enum(e) => render_enum(e),
    }
}

/// Python source for a record.
///
/// In dataclass mode fields without a default come first, then defaulted
/// fields, each group in schema order.
pub fn render_record(record: &Record, output_type: OutputType) -> String {
    let mut collector = Collector::new(&record.name);
    let class = class_name(&record.name);

    for field in &record.fields {
        let ty = collector.render(&field.ty);
        let default = field.default.as_ref().filter(|_| output_type.supports_defaults());
        let line = match default {
            Some(default) => {
                let literal = render_default(default, &mut collector);
                format!("    {}: {ty} = {literal}", field.name)
            }
            None => format!("    {}: {ty}", field.name),
        };
        let group = if default.is_some() {
            &mut collector.lines_with_default
        } else {
            &mut collector.lines
        };
        if let Some(doc) = &field.doc {
            group.extend(comment_lines(doc, "    "));
        }
        group.push(line);
    }

    let header = match output_type {
        OutputType::Dataclass => {
            collector.dataclasses.insert("dataclass");
            format!("@dataclass\nclass {class}:")
        }
        OutputType::TypedDict => {
            collector.typing.insert("TypedDict");
            format!("class {class}(TypedDict):")
        }
    };

    let mut body: Vec<String> = Vec::new();
    if let Some(doc) = &record.doc {
        body.push(format!("    \"\"\"{}\"\"\"", escape_docstring(doc)));
        if !record.fields.is_empty() {
            body.push(String::new());
        }
    }
    body.append(&mut collector.lines);
    body.append(&mut collector.lines_with_default);
    if body.is_empty() {
        body.push("    pass".to_string());
    }

    let mut out = with_imports(&collector);
    out.push_str(&header);
    out.push('\n');
    for line in body {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Python source for an enum: a `Literal` alias over its symbols.
pub fn render_enum(e: &Enum) -> String {
    let mut collector = Collector::new(&e.name);
    collector.typing.insert("Literal");

    let mut out = with_imports(&collector);
    if let Some(doc) = &e.doc {
        for line in comment_lines(doc, "") {
            out.push_str(&line);
            out.push('\n');
        }
    }
    let symbols: Vec<String> = e
        .symbols
        .iter()
        .map(|s| Value::String(s.clone()).to_string())
        .collect();
    out.push_str(&format!(
        "{} = Literal[{}]\n",
        class_name(&e.name),
        symbols.join(", ")
    ));
    out
}

fn with_imports(collector: &Collector) -> String {
    let imports = collector.import_lines();
    if imports.is_empty() {
        String::new()
    } else {
        format!("{}\n\n\n", imports.join("\n"))
    }
}

/// Python literal for a schema default.
///
/// Lists and mappings become empty `default_factory` fields; only their
/// emptiness is kept, not their contents.
fn render_default(default: &Value, collector: &mut Collector) -> String {
    match default {
        Value::String(_) => default.to_string(),
        Value::Array(_) => {
            collector.dataclasses.insert("field");
            "field(default_factory=list)".to_string()
        }
        Value::Object(_) => {
            collector.dataclasses.insert("field");
            "field(default_factory=dict)".to_string()
        }
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        Value::Number(n) => n.to_string(),
    }
}

/// `#` comment lines for a doc string; blank doc lines become a bare `#`.
fn comment_lines<'a>(doc: &'a str, indent: &'a str) -> impl Iterator<Item = String> + 'a {
    doc.lines().map(move |line| {
        if line.is_empty() {
            format!("{indent}#")
        } else {
            format!("{indent}# {line}")
        }
    })
}

/// Escape a doc for a `"""` string: backslashes, runs of three or more
/// quotes, and quotes that would run into the closing delimiter.
fn escape_docstring(doc: &str) -> String {
    let mut out = String::with_capacity(doc.len());
    let mut rest = doc;
    while let Some(c) = rest.chars().next() {
        if c == '"' {
            let run = rest.len() - rest.trim_start_matches('"').len();
            let quote = if run >= 3 || run == rest.len() { "\\\"" } else { "\"" };
            out.push_str(&quote.repeat(run));
            rest = &rest[run..];
        } else {
            if c == '\\' {
                out.push_str("\\\\");
            } else {
                out.push(c);
            }
            rest = &rest[c.len_utf8()..];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avro::{Field, Primitive, TypeDescriptor};
    use serde_json::json;
    use tempfile::tempdir;

    fn field(name: &str, ty: TypeDescriptor, default: Option<Value>) -> Field {
        Field {
            name: name.into(),
            ty,
            default,
            doc: None,
        }
    }

    fn prim(p: Primitive) -> TypeDescriptor {
        TypeDescriptor::Primitive(p)
    }

    #[test]
    fn defaulted_fields_trail_in_dataclass_mode() {
        let record = Record {
            name: "my.test.Mixed".into(),
            fields: vec![
                field("a", prim(Primitive::Integer), Some(json!(1))),
                field("b", prim(Primitive::String), None),
                field("c", TypeDescriptor::List(Box::new(prim(Primitive::String))), Some(json!(["x"]))),
                field("d", prim(Primitive::Boolean), None),
                field("e", prim(Primitive::String), Some(json!("say \"hi\""))),
                field("f", TypeDescriptor::Map(Box::new(prim(Primitive::Float))), Some(json!({}))),
                field("g", TypeDescriptor::Optional(Box::new(prim(Primitive::Integer))), Some(Value::Null)),
                field("h", prim(Primitive::Boolean), Some(json!(false))),
            ],
            doc: None,
        };
        let source = render_record(&record, OutputType::Dataclass);
        assert_eq!(
            source,
            concat!(
                "from dataclasses import dataclass, field\n",
                "from typing import Dict, List, Optional\n",
                "\n\n",
                "@dataclass\n",
                "class Mixed:\n",
                "    b: str\n",
                "    d: bool\n",
                "    a: int = 1\n",
                "    c: List[str] = field(default_factory=list)\n",
                "    e: str = \"say \\\"hi\\\"\"\n",
                "    f: Dict[str, float] = field(default_factory=dict)\n",
                "    g: Optional[int] = None\n",
                "    h: bool = False\n",
            )
        );
    }

    #[test]
    fn typed_dict_mode_drops_defaults_and_keeps_order() {
        let record = Record {
            name: "my.test.Weather".into(),
            fields: vec![
                field("temp", prim(Primitive::Integer), Some(json!(0))),
                field("station", prim(Primitive::String), None),
            ],
            doc: Some("A weather reading.".into()),
        };
        let source = render_record(&record, OutputType::TypedDict);
        assert_eq!(
            source,
            concat!(
                "from typing import TypedDict\n",
                "\n\n",
                "class Weather(TypedDict):\n",
                "    \"\"\"A weather reading.\"\"\"\n",
                "\n",
                "    temp: int\n",
                "    station: str\n",
            )
        );
    }

    #[test]
    fn docstring_quotes_never_close_early() {
        assert_eq!(escape_docstring(r#"He said "hi""#), r#"He said "hi\""#);
        assert_eq!(escape_docstring(r#"a """ b"#), r#"a \"\"\" b"#);
        assert_eq!(escape_docstring(r#"end"""#), r#"end\"\""#);
        assert_eq!(escape_docstring(r"C:\dir\"), r"C:\\dir\\");

        let record = Record {
            name: "a.Quote".into(),
            fields: vec![],
            doc: Some(r#"He said "hi""#.into()),
        };
        assert!(render_record(&record, OutputType::Dataclass)
            .contains(r#"    """He said "hi\"""""#));
    }

    #[test]
    fn field_docs_become_comments_above_the_field() {
        let record = Record {
            name: "a.Reading".into(),
            fields: vec![
                Field {
                    doc: Some("Degrees.\n\nCelsius.".into()),
                    ..field("temp", prim(Primitive::Float), Some(json!(0.0)))
                },
                Field {
                    doc: Some("Station id".into()),
                    ..field("station", prim(Primitive::String), None)
                },
            ],
            doc: None,
        };
        assert_eq!(
            render_record(&record, OutputType::Dataclass),
            concat!(
                "from dataclasses import dataclass\n",
                "\n\n",
                "@dataclass\n",
                "class Reading:\n",
                "    # Station id\n",
                "    station: str\n",
                "    # Degrees.\n",
                "    #\n",
                "    # Celsius.\n",
                "    temp: float = 0.0\n",
            )
        );
    }

    #[test]
    fn self_references_are_deferred_and_not_imported() {
        let record = Record {
            name: "tree.Node".into(),
            fields: vec![
                field("value", prim(Primitive::Integer), None),
                field("children", TypeDescriptor::List(Box::new(TypeDescriptor::Named("tree.Node".into()))), None),
                field("parent", TypeDescriptor::Optional(Box::new(TypeDescriptor::Named("tree.Node".into()))), None),
            ],
            doc: None,
        };
        let source = render_record(&record, OutputType::Dataclass);
        assert!(source.contains("    children: List[\"Node\"]\n"));
        assert!(source.contains("    parent: Optional[\"Node\"]\n"));
        assert!(!source.contains("from tree.node import"));
    }

    #[test]
    fn empty_record_gets_a_pass_body() {
        let record = Record {
            name: "Empty".into(),
            fields: vec![],
            doc: None,
        };
        assert_eq!(
            render_record(&record, OutputType::Dataclass),
            "from dataclasses import dataclass\n\n\n@dataclass\nclass Empty:\n    pass\n"
        );
    }

    #[test]
    fn enum_renders_as_literal_alias() {
        let e = Enum {
            name: "cards.Suit".into(),
            symbols: vec!["SPADES".into(), "HEARTS".into()],
            doc: Some("Card suits.\n\nFour of them.".into()),
        };
        assert_eq!(
            render_enum(&e),
            concat!(
                "from typing import Literal\n",
                "\n\n",
                "# Card suits.\n",
                "#\n",
                "# Four of them.\n",
                "Suit = Literal[\"SPADES\", \"HEARTS\"]\n",
            )
        );
    }

    #[test]
    fn emit_places_file_by_stripped_namespace() {
        let dir = tempdir().unwrap();
        let schema = json!({
            "type": "record", "name": "com.example.my.test.Weather",
            "fields": [{"name": "station", "type": "string"}]
        });
        let emitted = emit(&schema, OutputType::Dataclass, "com.example.", dir.path()).unwrap();
        assert_eq!(emitted.path, dir.path().join("my/test/weather.py"));
        assert_eq!(emitted.namespace_root.as_deref(), Some("my"));
        assert_eq!(emitted.named.name(), "my.test.Weather");
        let written = fs::read_to_string(&emitted.path).unwrap();
        assert!(written.contains("class Weather:\n    station: str\n"));
    }

    #[test]
    fn output_type_parses_its_names() {
        assert_eq!("dataclass".parse::<OutputType>(), Ok(OutputType::Dataclass));
        assert_eq!("TypedDict".parse::<OutputType>(), Ok(OutputType::TypedDict));
        assert!("typeddict".parse::<OutputType>().is_err());
    }
}
