use std::collections::BTreeSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::GenerateError;

/// Package marker written into every generated directory.
pub const PACKAGE_MARKER: &str = "__init__.py";

/// Make every directory under each namespace root importable as a package.
///
/// Missing markers are created empty; existing ones are left untouched.
/// Returns the markers that were created.
pub fn ensure_package_markers(
    output_root: &Path,
    namespace_roots: &BTreeSet<String>,
) -> Result<Vec<PathBuf>, GenerateError> {
    let mut created = Vec::new();
    for root in namespace_roots {
        let root_dir = output_root.join(root);
        let dirs = WalkDir::new(&root_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.file_type().is_dir());
        for entry in dirs {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root_dir.clone());
                GenerateError::io(path, e.into())
            })?;
            let marker = entry.path().join(PACKAGE_MARKER);
            match OpenOptions::new().write(true).create_new(true).open(&marker) {
                Ok(_) => {
                    tracing::debug!(path = %marker.display(), "created package marker");
                    created.push(marker);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
                Err(e) => return Err(GenerateError::io(marker, e)),
            }
        }
    }
    Ok(created)
}
