//! External tool detection.

use pf_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Require that a tool is available on `PATH`, returning its full path.
///
/// # Errors
///
/// Returns [`Error::ToolNotFound`] if the tool cannot be located.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Resolve a tool, preferring an explicitly configured binary over `PATH`.
///
/// A configured path that is not a regular file is ignored with a warning
/// and the `PATH` lookup is used instead.
pub fn resolve_tool(name: &str, explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        tracing::warn!(
            "configured {name} binary {} does not exist, falling back to PATH",
            path.display()
        );
    }
    require_tool(name)
}
