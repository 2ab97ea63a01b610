use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static AVRO_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid name regex"));

/// Whether `name` is a valid unqualified Avro name.
pub fn is_avro_name(name: &str) -> bool {
    AVRO_NAME.is_match(name)
}

/// Whether `name` is a valid Avro full name: dot separated Avro names.
pub fn is_avro_fullname(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_avro_name)
}

/// Build the full name of a schema from its `name` and the namespace in scope.
///
/// A name that already contains a dot is taken as fully qualified.
pub fn fullname(name: &str, namespace: &str) -> String {
    if name.contains('.') || namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

/// Split a qualified name into `(namespace, name)`.
pub fn split_qualified(qualified: &str) -> (&str, &str) {
    match qualified.rsplit_once('.') {
        Some((namespace, name)) => (namespace, name),
        None => ("", qualified),
    }
}

/// Remove `prefix` from a qualified name when it is a true leading substring.
pub fn strip_namespace_prefix<'a>(qualified: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return qualified;
    }
    qualified.strip_prefix(prefix).unwrap_or(qualified)
}

/// Declared Python class name for a qualified name: the last segment, first letter upper-cased.
pub fn class_name(qualified: &str) -> String {
    capitalize(split_qualified(qualified).1)
}

/// Lower-case word separated file stem for a type name.
///
/// Every upper-case letter after position 0 starts a new word, so
/// `WeatherReport` becomes `weather_report` and `HTTPCode` becomes `h_t_t_p_code`.
pub fn snake(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    for (i, c) in input.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Python module path of the file a qualified name is emitted into.
pub fn module_path(qualified: &str) -> String {
    let (namespace, name) = split_qualified(qualified);
    if namespace.is_empty() {
        snake(name)
    } else {
        format!("{namespace}.{}", snake(name))
    }
}

/// File a qualified name is emitted into, relative to `output_root`.
pub fn output_path(output_root: &Path, qualified: &str, extension: &str) -> PathBuf {
    let (namespace, name) = split_qualified(qualified);
    let mut path = output_root.to_path_buf();
    for segment in namespace.split('.').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.push(format!("{}.{extension}", snake(name)));
    path
}

/// First namespace segment of a qualified name, if it has a namespace.
pub fn namespace_root(qualified: &str) -> Option<&str> {
    let (namespace, _) = split_qualified(qualified);
    namespace.split('.').next().filter(|s| !s.is_empty())
}

/// Capitalize first letter
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
