use std::collections::BTreeSet;

use crate::avro::TypeDescriptor;
use crate::common::names::{class_name, module_path};

/// Accumulator for one record or enum emission.
///
/// Created fresh for every named schema and dropped once its file is written.
#[derive(Debug, Default)]
pub struct Collector {
    /// Qualified name of the type being emitted.
    pub record_name: String,
    /// Names imported from `typing`.
    pub typing: BTreeSet<&'static str>,
    /// Names imported from `dataclasses`.
    pub dataclasses: BTreeSet<&'static str>,
    /// Qualified names of other named types this declaration refers to.
    pub imports: BTreeSet<String>,
    /// Field lines without a default.
    pub lines: Vec<String>,
    /// Field lines with a default; always emitted after `lines`.
    pub lines_with_default: Vec<String>,
    deferred_self: bool,
}

impl Collector {
    pub fn new(record_name: impl Into<String>) -> Self {
        Self {
            record_name: record_name.into(),
            ..Self::default()
        }
    }

    /// Render a descriptor as a Python type expression.
    ///
    /// A reference to the type being emitted that sits inside a container is
    /// written as a quoted forward reference and never imported. A field typed
    /// directly as the type itself is left alone.
    pub fn render(&mut self, ty: &TypeDescriptor) -> String {
        self.render_at(ty, 0)
    }

    fn render_at(&mut self, ty: &TypeDescriptor, depth: usize) -> String {
        match ty {
            TypeDescriptor::Primitive(p) => p.python_name().to_string(),
            TypeDescriptor::Optional(inner) => {
                self.typing.insert("Optional");
                format!("Optional[{}]", self.render_at(inner, depth + 1))
            }
            TypeDescriptor::Union(alternatives) => {
                self.typing.insert("Union");
                let rendered: Vec<String> = alternatives
                    .iter()
                    .map(|alt| self.render_at(alt, depth + 1))
                    .collect();
                format!("Union[{}]", rendered.join(", "))
            }
            TypeDescriptor::List(item) => {
                self.typing.insert("List");
                format!("List[{}]", self.render_at(item, depth + 1))
            }
            TypeDescriptor::Map(value) => {
                self.typing.insert("Dict");
                format!("Dict[str, {}]", self.render_at(value, depth + 1))
            }
            TypeDescriptor::Named(name) => {
                let class = class_name(name);
                if depth > 0 && *name == self.record_name {
                    self.deferred_self = true;
                    format!("\"{class}\"")
                } else {
                    self.imports.insert(name.clone());
                    class
                }
            }
        }
    }

    /// Import statements for everything collected so far.
    ///
    /// `dataclasses` then `typing`, names sorted, then one import per named
    /// reference in qualified-name order.
    pub fn import_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.dataclasses.is_empty() {
            out.push(format!(
                "from dataclasses import {}",
                join(&self.dataclasses)
            ));
        }
        if !self.typing.is_empty() {
            out.push(format!("from typing import {}", join(&self.typing)));
        }
        for name in &self.imports {
            if self.deferred_self && *name == self.record_name {
                continue;
            }
            out.push(format!(
                "from {} import {}",
                module_path(name),
                class_name(name)
            ));
        }
        out
    }
}

fn join(names: &BTreeSet<&'static str>) -> String {
    names.iter().copied().collect::<Vec<_>>().join(", ")
}
