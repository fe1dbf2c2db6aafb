//! CLI argument definitions for the three binaries.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Options shared by every binary.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Path to devkit.toml (overrides DEVKIT_CONFIG_PATH).
    #[arg(long = "config", value_name = "PATH")]
    pub config_override: Option<PathBuf>,
    /// Project root (defaults to project.root, the config file's directory, or the current directory).
    #[arg(long = "project-root", value_name = "DIR")]
    pub project_root: Option<PathBuf>,
}

/// `load-env`: run the build tool with `.env` values injected as flags.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "load-env",
    author,
    version,
    about = "Load environment variables from .env and run the build tool with them as define flags",
    after_help = "Example: load-env --show-env build apk --release"
)]
pub struct LoadEnvArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Path to the env file, relative to the project root (default: translator.env_file, `.env`).
    #[arg(long = "env-file", value_name = "PATH")]
    pub env_file: Option<PathBuf>,
    /// Show loaded environment variables before running (sensitive values masked).
    #[arg(long = "show-env", default_value_t = false)]
    pub show_env: bool,
    /// Build tool command to run (e.g. `run`, `build apk`).
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

/// `run-full-stack`: run the backend server and the app together.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "run-full-stack",
    author,
    version,
    about = "Install dependencies, then run the backend server and the app build side by side"
)]
pub struct RunFullStackArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Skip the dependency installation step.
    #[arg(long, default_value_t = false)]
    pub skip_install: bool,
}

/// `setup-env`: create or inspect the working `.env`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "setup-env",
    author,
    version,
    about = "Set up the .env file from its template, or show the current configuration",
    disable_help_subcommand = true
)]
pub struct SetupEnvArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Action to perform (default: setup).
    #[command(subcommand)]
    pub command: Option<SetupCommand>,
}

/// `setup-env` actions.
#[derive(Debug, Clone, Subcommand)]
pub enum SetupCommand {
    /// Copy the template into the working config file.
    Setup(SetupArgs),
    /// Show the working config with sensitive values masked.
    Show,
    /// Show usage.
    Help,
}

impl Default for SetupCommand {
    fn default() -> Self {
        SetupCommand::Setup(SetupArgs::default())
    }
}

/// Arguments for `setup`.
#[derive(Debug, Clone, Default, Args)]
pub struct SetupArgs {
    /// Overwrite an existing file without asking.
    #[arg(long, default_value_t = false)]
    pub force: bool,
}
