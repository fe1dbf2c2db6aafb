use tracing::{debug, info};

use super::{ConfigLocation, DevkitConfig, CONFIG_ENV_KEY, DEFAULT_CONFIG_PATH};

pub fn log_source(location: &ConfigLocation, from_cli: bool) {
    if from_cli {
        info!(
            target: "eventura_devkit::config",
            path = %location.path.display(),
            "Loading configuration from --config"
        );
    } else if location.explicit {
        info!(
            target: "eventura_devkit::config",
            path = %location.path.display(),
            "Loading configuration using DEVKIT_CONFIG_PATH environment variable"
        );
    } else {
        debug!(
            target: "eventura_devkit::config",
            path = %location.path.display(),
            env = CONFIG_ENV_KEY,
            default = DEFAULT_CONFIG_PATH,
            "DEVKIT_CONFIG_PATH not set; using default devkit.toml"
        );
    }
}

pub fn log_defaults(path: &std::path::Path) {
    debug!(
        target: "eventura_devkit::config",
        path = %path.display(),
        "No configuration file found; using built-in defaults"
    );
}

pub fn log_loaded(config: &DevkitConfig) {
    info!(
        target: "eventura_devkit::config",
        path = %config
            .source_path
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_default(),
        build_tool = %config.translator.build_tool,
        define_flag = %config.translator.define_flag,
        server_command = %config.supervisor.server_command,
        install_enabled = config.supervisor.install_command.is_some(),
        grace_secs = config.supervisor.grace.as_secs(),
        template_file = %config.initializer.template_file.display(),
        "Configuration file loaded successfully"
    );
}
