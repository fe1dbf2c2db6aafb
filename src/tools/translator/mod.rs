//! Turn `.env` entries into build flags and hand off to the build tool.
mod launcher;

use std::path::{Path, PathBuf};

use crate::{
    config::TranslatorSection,
    lib::{envfile::EnvFile, paths::resolve_in_root},
};

pub use launcher::{launch, resolve_tool, LaunchMode};

/// A build tool invocation with injected flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub tool: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Full argv as displayed to the user.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.tool.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }

    pub fn display(&self) -> String {
        self.argv().join(" ")
    }
}

/// Resolve the env file path: an explicit `--env-file` wins over the configured default.
pub fn resolve_env_path(
    section: &TranslatorSection,
    project_root: &Path,
    override_path: Option<&Path>,
) -> PathBuf {
    let path = override_path.unwrap_or(&section.env_file);
    resolve_in_root(project_root, path)
}

/// `[command words] + [one flag per entry]` for the configured build tool.
pub fn build_invocation(
    section: &TranslatorSection,
    command: &[String],
    env: &EnvFile,
) -> Invocation {
    let mut args = command.to_vec();
    args.extend(env.define_flags(&section.define_flag));
    Invocation {
        tool: section.build_tool.clone(),
        args,
    }
}

/// Lines printed by `--show-env`.
pub fn env_listing(env: &EnvFile) -> Vec<String> {
    let mut lines = vec!["Loaded environment variables:".to_string()];
    lines.extend(env.entries().iter().map(|entry| format!("  {}", entry.masked())));
    lines.push(String::new());
    lines
}
