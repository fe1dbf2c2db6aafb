//! Shared helpers reused across modules (e.g., path resolution).

use std::path::{Path, PathBuf};

/// Resolve `path` against `root` unless it is already absolute.
pub fn resolve_in_root(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Sibling executable of the running binary (e.g. `load-env` next to `run-full-stack`).
pub fn sibling_executable(name: &str) -> std::io::Result<PathBuf> {
    let current = std::env::current_exe()?;
    Ok(current.with_file_name(format!("{name}{}", std::env::consts::EXE_SUFFIX)))
}
