use std::path::Path;
use std::process::Command;

use crate::error::GenerateError;

/// Formatter run over generated packages unless disabled.
pub const DEFAULT_FORMATTER: &str = "black";

/// Run a formatter command over `path`.
///
/// `command` is split on whitespace, so extra arguments such as
/// `"black --quiet"` are passed through before the path.
pub fn run_formatter(command: &str, path: &Path) -> Result<(), GenerateError> {
    let failed = |message: String| GenerateError::Formatter {
        command: command.to_string(),
        path: path.to_path_buf(),
        message,
    };

    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| failed("empty formatter command".to_string()))?;

    tracing::debug!(command, path = %path.display(), "running formatter");
    let output = Command::new(program)
        .args(parts)
        .arg(path)
        .output()
        .map_err(|e| failed(e.to_string()))?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(failed(format!("{} {}", output.status, stderr.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_formatter_is_an_error() {
        let dir = tempdir().unwrap();
        let err = run_formatter("avrogen-no-such-formatter", dir.path()).unwrap_err();
        assert!(matches!(err, GenerateError::Formatter { .. }));
    }

    #[test]
    fn empty_command_is_rejected() {
        let dir = tempdir().unwrap();
        let err = run_formatter("  ", dir.path()).unwrap_err();
        assert!(err.to_string().contains("empty formatter command"));
    }

    #[cfg(unix)]
    #[test]
    fn successful_command_passes() {
        let dir = tempdir().unwrap();
        run_formatter("true", dir.path()).unwrap();
        let err = run_formatter("false", dir.path()).unwrap_err();
        assert!(matches!(err, GenerateError::Formatter { .. }));
    }
}
