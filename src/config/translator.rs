use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const DEFAULT_BUILD_TOOL: &str = "flutter";
pub const DEFAULT_DEFINE_FLAG: &str = "--define";
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Settings for the `.env` to build-flag translator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorSection {
    pub build_tool: String,
    pub define_flag: String,
    pub env_file: PathBuf,
}

impl Default for TranslatorSection {
    fn default() -> Self {
        Self {
            build_tool: DEFAULT_BUILD_TOOL.to_string(),
            define_flag: DEFAULT_DEFINE_FLAG.to_string(),
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawTranslatorSection {
    pub build_tool: Option<String>,
    pub define_flag: Option<String>,
    pub env_file: Option<PathBuf>,
}

pub fn parse_translator_section(
    raw: Option<RawTranslatorSection>,
    path: &Path,
) -> Result<TranslatorSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let defaults = TranslatorSection::default();

    let build_tool = raw.build_tool.unwrap_or(defaults.build_tool);
    if build_tool.trim().is_empty() {
        return Err(invalid(path, "translator.build_tool", "Use a non-empty program name"));
    }

    let define_flag = raw.define_flag.unwrap_or(defaults.define_flag);
    if !define_flag.starts_with("--") || define_flag.len() <= 2 || define_flag.contains('=') {
        return Err(invalid(
            path,
            "translator.define_flag",
            "Use a long option such as `--define` or `--dart-define`",
        ));
    }

    let env_file = raw.env_file.unwrap_or(defaults.env_file);
    if env_file.as_os_str().is_empty() {
        return Err(invalid(path, "translator.env_file", "Use a non-empty file path"));
    }

    Ok(TranslatorSection {
        build_tool,
        define_flag,
        env_file,
    })
}

fn invalid(path: &Path, field: &'static str, message: &str) -> ConfigError {
    ConfigError::InvalidField {
        path: path.to_path_buf(),
        field,
        message: message.into(),
    }
}
