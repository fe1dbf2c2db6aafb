//! Resolution of configuration and project root shared by all binaries.
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::DevkitConfig;

use super::CommonArgs;

/// Loaded configuration plus the directory every relative path is resolved against.
#[derive(Debug, Clone)]
pub struct Profile {
    pub config: DevkitConfig,
    pub project_root: PathBuf,
}

impl CommonArgs {
    /// Load the configuration and resolve the project root.
    pub fn resolve(&self) -> Result<Profile> {
        let config = DevkitConfig::load(self.config_override.clone())?;
        let project_root = config
            .project_root(self.project_root.clone())
            .context("failed to obtain current directory")?;
        Ok(Profile {
            config,
            project_root,
        })
    }
}
