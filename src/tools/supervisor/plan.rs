use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{config::SupervisorSection, lib::process::CommandSpec};

/// Fully resolved description of what a stack run will execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackPlan {
    pub project_root: PathBuf,
    pub install: Option<CommandSpec>,
    pub server: CommandSpec,
    pub client: CommandSpec,
    pub server_label: String,
    pub client_label: String,
    pub warmup: Duration,
    pub grace: Duration,
    pub poll_interval: Duration,
}

/// Inputs needed to build the default client command.
#[derive(Debug, Clone, Copy)]
pub struct ClientDefaults<'a> {
    /// The translator binary shipped alongside the supervisor.
    pub translator_binary: &'a Path,
    /// Config file to hand to the translator, if one was loaded.
    pub config_path: Option<&'a Path>,
}

impl StackPlan {
    /// Build a plan from the supervisor section.
    pub fn from_section(
        section: &SupervisorSection,
        project_root: &Path,
        client_defaults: ClientDefaults<'_>,
        skip_install: bool,
    ) -> Self {
        let install = if skip_install {
            None
        } else {
            section.install_command.clone()
        };

        let client = section
            .client_command
            .clone()
            .unwrap_or_else(|| default_client(section, project_root, client_defaults));

        Self {
            project_root: project_root.to_path_buf(),
            install,
            server: section.server_command.clone(),
            client,
            server_label: section.server_label.clone(),
            client_label: section.client_label.clone(),
            warmup: section.warmup,
            grace: section.grace,
            poll_interval: section.poll_interval,
        }
    }
}

fn default_client(
    section: &SupervisorSection,
    project_root: &Path,
    defaults: ClientDefaults<'_>,
) -> CommandSpec {
    let mut args = Vec::new();
    if let Some(config_path) = defaults.config_path {
        args.push("--config".to_string());
        args.push(config_path.display().to_string());
    }
    args.push("--project-root".to_string());
    args.push(project_root.display().to_string());
    args.extend(section.client_args.iter().cloned());
    CommandSpec {
        program: defaults.translator_binary.display().to_string(),
        args,
    }
}
