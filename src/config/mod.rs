//! Load and validate the devkit configuration file.
use std::{
    env, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{error, info};

use crate::lib::errors::ConfigError;

pub mod initializer;
pub mod project;
pub mod supervisor;
pub mod telemetry;
pub mod translator;

pub use initializer::{
    parse_initializer_section, InitializerSection, RawInitializerSection, DEFAULT_TARGET_FILE,
    DEFAULT_TEMPLATE_FILE,
};
pub use project::{parse_project_section, ProjectSection, RawProjectSection};
pub use supervisor::{
    parse_supervisor_section, RawSupervisorSection, SupervisorSection, DEFAULT_CLIENT_LABEL,
    DEFAULT_GRACE_SECS, DEFAULT_SERVER_LABEL, DEFAULT_WARMUP_SECS,
};
pub use translator::{
    parse_translator_section, RawTranslatorSection, TranslatorSection, DEFAULT_BUILD_TOOL,
    DEFAULT_DEFINE_FLAG, DEFAULT_ENV_FILE,
};

pub const CONFIG_ENV_KEY: &str = "DEVKIT_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "devkit.toml";

/// Top-level configuration container.
#[derive(Debug, Clone, Default)]
pub struct DevkitConfig {
    pub project: ProjectSection,
    pub translator: TranslatorSection,
    pub supervisor: SupervisorSection,
    pub initializer: InitializerSection,
    /// File the configuration was read from; `None` when defaults are in effect.
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawDevkitConfig {
    project: Option<RawProjectSection>,
    translator: Option<RawTranslatorSection>,
    supervisor: Option<RawSupervisorSection>,
    initializer: Option<RawInitializerSection>,
}

/// Where the configuration file is looked up and whether it must exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub explicit: bool,
}

/// Resolve the config location in the order: CLI override → env var → default.
pub fn resolve_config_location(
    override_path: Option<PathBuf>,
    env_value: Option<String>,
) -> ConfigLocation {
    if let Some(path) = override_path {
        return ConfigLocation {
            path,
            explicit: true,
        };
    }
    match env_value {
        Some(value) if !value.trim().is_empty() => ConfigLocation {
            path: PathBuf::from(value),
            explicit: true,
        },
        _ => ConfigLocation {
            path: PathBuf::from(DEFAULT_CONFIG_PATH),
            explicit: false,
        },
    }
}

impl DevkitConfig {
    /// Load using `--config`, then `DEVKIT_CONFIG_PATH`, then `devkit.toml` if present.
    pub fn load(override_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let from_cli = override_path.is_some();
        let location = resolve_config_location(override_path, env::var(CONFIG_ENV_KEY).ok());
        telemetry::log_source(&location, from_cli);

        if !location.path.exists() {
            if location.explicit {
                error!(
                    target: "eventura_devkit::config",
                    path = %location.path.display(),
                    "Configuration file not found"
                );
                return Err(ConfigError::NotFound {
                    path: location.path,
                });
            }
            telemetry::log_defaults(&location.path);
            return Ok(Self::default());
        }

        Self::load_from_path(location.path)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        info!(
            target: "eventura_devkit::config",
            path = %path.display(),
            "Starting configuration load"
        );

        let builder = config::Config::builder()
            .add_source(config::File::from(path.clone()).format(config::FileFormat::Toml));
        let document = builder.build().map_err(|err| {
            let error = ConfigError::from_read_error(path.clone(), err);
            error!(
                target: "eventura_devkit::config",
                path = %path.display(),
                reason = %error,
                "Failed to read configuration file"
            );
            error
        })?;

        let raw: RawDevkitConfig = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(path.clone(), err);
            error!(
                target: "eventura_devkit::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse configuration file"
            );
            error
        })?;

        let config = Self::from_raw(raw, path.clone()).map_err(|err| {
            error!(
                target: "eventura_devkit::config",
                path = %path.display(),
                reason = %err,
                "Failed to validate configuration file"
            );
            err
        })?;

        telemetry::log_loaded(&config);
        Ok(config)
    }

    fn from_raw(raw: RawDevkitConfig, path: PathBuf) -> Result<Self, ConfigError> {
        let project = parse_project_section(raw.project, &path)?;
        let translator = parse_translator_section(raw.translator, &path)?;
        let supervisor = parse_supervisor_section(raw.supervisor, &path)?;
        let initializer = parse_initializer_section(raw.initializer, &path)?;

        Ok(Self {
            project,
            translator,
            supervisor,
            initializer,
            source_path: Some(path),
        })
    }

    /// Resolve the project root: CLI override → `project.root` → config directory → cwd.
    pub fn project_root(&self, override_root: Option<PathBuf>) -> io::Result<PathBuf> {
        let cwd = env::current_dir()?;
        let root = override_root
            .map(|root| absolutize(&cwd, root))
            .or_else(|| self.project.root.clone().map(|root| absolutize(&cwd, root)))
            .or_else(|| {
                self.source_path
                    .as_deref()
                    .and_then(Path::parent)
                    .map(|dir| absolutize(&cwd, dir.to_path_buf()))
            })
            .unwrap_or(cwd);
        Ok(root)
    }
}

fn absolutize(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}
