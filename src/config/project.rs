use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lib::{errors::ConfigError, paths::resolve_in_root};

/// Project layout settings.
#[derive(Debug, Clone, Default)]
pub struct ProjectSection {
    /// Explicit project root, already resolved against the config file's directory.
    pub root: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawProjectSection {
    pub root: Option<PathBuf>,
}

pub fn parse_project_section(
    raw: Option<RawProjectSection>,
    path: &Path,
) -> Result<ProjectSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let Some(root) = raw.root else {
        return Ok(ProjectSection::default());
    };

    if root.as_os_str().is_empty() {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "project.root",
            message: "Use a non-empty directory path".into(),
        });
    }

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(ProjectSection {
        root: Some(resolve_in_root(base, &root)),
    })
}
