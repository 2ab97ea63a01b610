//! The descriptor table: every named type of a generation run, keyed by
//! qualified name. The structural converter looks named references up here
//! instead of inspecting generated code.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::avro::{Enum, NamedType, Record};
use crate::error::GenerateError;
use crate::generator::resolver::describe_named;
use crate::schema::ParsedSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    types: IndexMap<String, NamedType>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Describe every named type of a parsed schema set.
    pub fn from_parsed(parsed: &ParsedSchema, namespace_prefix: &str) -> Result<Self, GenerateError> {
        let mut catalog = Catalog::new();
        for schema in parsed.named.values() {
            catalog.insert(describe_named(schema, namespace_prefix)?);
        }
        Ok(catalog)
    }

    /// Add or replace a named type.
    pub fn insert(&mut self, named: NamedType) {
        self.types.insert(named.name().to_string(), named);
    }

    pub fn get(&self, name: &str) -> Option<&NamedType> {
        self.types.get(name)
    }

    pub fn record(&self, name: &str) -> Option<&Record> {
        match self.types.get(name) {
            Some(NamedType::Record(r)) => Some(r),
            _ => None,
        }
    }

    pub fn enumeration(&self, name: &str) -> Option<&Enum> {
        match self.types.get(name) {
            Some(NamedType::Enum(e)) => Some(e),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Write the table as pretty JSON.
    pub fn write(&self, path: &Path) -> Result<(), GenerateError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| GenerateError::Json {
            location: path.display().to_string(),
            source,
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| GenerateError::io(parent, e))?;
        }
        fs::write(path, json).map_err(|e| GenerateError::io(path, e))
    }

    /// Read a table written by [`Catalog::write`].
    pub fn read(path: &Path) -> Result<Self, GenerateError> {
        let content = fs::read_to_string(path).map_err(|e| GenerateError::io(path, e))?;
        serde_json::from_str(&content).map_err(|source| GenerateError::Json {
            location: path.display().to_string(),
            source,
        })
    }
}
