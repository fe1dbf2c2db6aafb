use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const DEFAULT_TEMPLATE_FILE: &str = "env_actual_values.txt";
pub const DEFAULT_TARGET_FILE: &str = ".env";

/// Template and working-file names for the initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializerSection {
    pub template_file: PathBuf,
    pub target_file: PathBuf,
}

impl Default for InitializerSection {
    fn default() -> Self {
        Self {
            template_file: PathBuf::from(DEFAULT_TEMPLATE_FILE),
            target_file: PathBuf::from(DEFAULT_TARGET_FILE),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawInitializerSection {
    pub template_file: Option<PathBuf>,
    pub target_file: Option<PathBuf>,
}

pub fn parse_initializer_section(
    raw: Option<RawInitializerSection>,
    path: &Path,
) -> Result<InitializerSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let defaults = InitializerSection::default();
    let template_file = raw.template_file.unwrap_or(defaults.template_file);
    let target_file = raw.target_file.unwrap_or(defaults.target_file);

    for (field, value) in [
        ("initializer.template_file", &template_file),
        ("initializer.target_file", &target_file),
    ] {
        if value.as_os_str().is_empty() {
            return Err(ConfigError::InvalidField {
                path: path.to_path_buf(),
                field,
                message: "Use a non-empty file path".into(),
            });
        }
    }

    if template_file == target_file {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "initializer.target_file",
            message: "The target must differ from the template".into(),
        });
    }

    Ok(InitializerSection {
        template_file,
        target_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_equal_to_template_is_rejected() {
        let err = parse_initializer_section(
            Some(RawInitializerSection {
                template_file: Some(".env".into()),
                target_file: None,
            }),
            Path::new("devkit.toml"),
        )
        .expect_err("copying a file onto itself is invalid");
        match err {
            ConfigError::InvalidField { field, .. } => assert_eq!(field, "initializer.target_file"),
            other => panic!("Unexpected error: {other:?}"),
        }
    }
}
