//! Loading Avro schema documents from files, stdin, URLs and ordering manifests.

use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;
use url::Url;

use crate::common::traversal::{qualify_schema, NamedSchemas};
use crate::error::GenerateError;

/// Logical schema-set name → locations, loaded in order.
pub type Manifest = IndexMap<String, Vec<String>>;

/// A schema document with every name qualified, plus the registry of the
/// named types reachable from it.
#[derive(Debug, Clone)]
pub struct ParsedSchema {
    pub schema: Value,
    pub named: NamedSchemas,
}

impl ParsedSchema {
    /// Full name of the root schema when it is a named type.
    pub fn root_name(&self) -> Option<&str> {
        self.schema.get("name").and_then(Value::as_str)
    }
}

/// Qualify a single in-memory schema document.
pub fn parse_schema(raw: &Value) -> Result<ParsedSchema, GenerateError> {
    let mut named = NamedSchemas::new();
    let schema = qualify_schema(raw, "", &mut named)?;
    Ok(ParsedSchema { schema, named })
}

/// Load several schema documents in order, sharing one named-type registry.
///
/// Later documents may reference types defined by earlier ones. The last
/// document is the root.
pub fn load_schema_ordered<S: AsRef<str>>(locations: &[S]) -> Result<ParsedSchema, GenerateError> {
    let mut named = NamedSchemas::new();
    let mut schema = Value::Null;
    for location in locations {
        let location = location.as_ref();
        let raw = load_json(location)?;
        schema = qualify_schema(&raw, "", &mut named)?;
        tracing::debug!(location, named = named.len(), "loaded schema");
    }
    Ok(ParsedSchema { schema, named })
}

/// Read and parse one JSON schema document.
pub fn load_json(location: &str) -> Result<Value, GenerateError> {
    let content = read_location(location)?;
    serde_json::from_str(&content).map_err(|source| GenerateError::Json {
        location: location.to_string(),
        source,
    })
}

/// Read the text behind a location: `-` for stdin, an `http(s)` URL, or a file path.
pub fn read_location(location: &str) -> Result<String, GenerateError> {
    if location == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| GenerateError::io("<stdin>", e))?;
        return Ok(content);
    }
    if let Ok(url) = Url::parse(location) {
        if matches!(url.scheme(), "http" | "https") {
            let fetch_err = |source| GenerateError::Fetch {
                location: location.to_string(),
                source,
            };
            return reqwest::blocking::get(url)
                .and_then(|r| r.error_for_status())
                .map_err(fetch_err)?
                .text()
                .map_err(fetch_err);
        }
    }
    fs::read_to_string(location).map_err(|e| GenerateError::io(location, e))
}

/// Read an ordering manifest: a TOML table of `name = [locations...]`.
pub fn read_manifest(path: &Path) -> Result<Manifest, GenerateError> {
    let content = fs::read_to_string(path).map_err(|e| GenerateError::io(path, e))?;
    parse_manifest(&content).map_err(|source| GenerateError::Manifest {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_manifest(content: &str) -> Result<Manifest, toml::de::Error> {
    toml::from_str(content)
}

/// One single-location schema set per file argument, keyed by file name.
pub fn manifest_from_files<S: AsRef<str>>(files: &[S]) -> Manifest {
    files
        .iter()
        .map(|f| {
            let f = f.as_ref();
            let key = f.rsplit('/').next().unwrap_or(f).to_string();
            (key, vec![f.to_string()])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn manifest_keeps_location_order() {
        let manifest = parse_manifest(
            r#"
weather = ["station.avsc", "weather.avsc"]
other = ["other.avsc"]
"#,
        )
        .unwrap();
        assert_eq!(manifest["weather"], vec!["station.avsc", "weather.avsc"]);
        assert_eq!(manifest["other"], vec!["other.avsc"]);
    }

    #[test]
    fn file_arguments_are_keyed_by_file_name() {
        let manifest = manifest_from_files(&["schemas/a.avsc", "b.avsc"]);
        assert_eq!(manifest["a.avsc"], vec!["schemas/a.avsc"]);
        assert_eq!(manifest["b.avsc"], vec!["b.avsc"]);
    }

    #[test]
    fn ordered_load_shares_named_types() {
        let dir = tempdir().unwrap();
        let station = dir.path().join("station.avsc");
        let weather = dir.path().join("weather.avsc");
        fs::write(
            &station,
            json!({"type": "record", "name": "Station", "namespace": "my.test",
                   "fields": [{"name": "id", "type": "string"}]})
            .to_string(),
        )
        .unwrap();
        fs::write(
            &weather,
            json!({"type": "record", "name": "Weather", "namespace": "my.test",
                   "fields": [{"name": "station", "type": "Station"}]})
            .to_string(),
        )
        .unwrap();

        let parsed = load_schema_ordered(&[
            station.to_str().unwrap(),
            weather.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(parsed.root_name(), Some("my.test.Weather"));
        assert_eq!(parsed.schema["fields"][0]["type"], "my.test.Station");
        assert_eq!(parsed.named.len(), 2);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_location("/definitely/not/here.avsc").unwrap_err();
        assert!(matches!(err, GenerateError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.avsc"));
    }
}
