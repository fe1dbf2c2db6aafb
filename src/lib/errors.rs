use std::{io, path::PathBuf};

use config::ConfigError as ConfigLoaderError;
use thiserror::Error;

/// Errors that can occur while loading or validating the devkit configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    #[error("Configuration file {path} not found")]
    NotFound { path: PathBuf },
    /// Failed to build (read) the configuration file.
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize TOML into a struct.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Field failed validation.
    #[error("Configuration file {path} has invalid `{field}`: {message}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` as a read failure.
    pub fn from_read_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::FileRead { path, source }
    }

    /// Helper to wrap `config::ConfigError` as a parse failure.
    pub fn from_parse_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::Parse { path, source }
    }
}

/// Failure to read an env file that exists on disk.
#[derive(Debug, Error)]
pub enum EnvFileError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures of the `.env` to build-flag translator.
#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error(transparent)]
    EnvFile(#[from] EnvFileError),
    #[error("Error: {tool} not found. Make sure {tool} is installed and in your PATH.")]
    ToolNotFound { tool: String },
    #[error("Failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: io::Error,
    },
    #[error("Error running {tool} command (exit={exit_code:?})")]
    ToolFailed {
        tool: String,
        exit_code: Option<i32>,
    },
}

impl TranslatorError {
    /// Process exit code for this failure; a failing tool's own code is kept.
    pub fn exit_code(&self) -> u8 {
        match self {
            TranslatorError::ToolFailed {
                exit_code: Some(code),
                ..
            } => u8::try_from(*code).ok().filter(|code| *code != 0).unwrap_or(1),
            _ => 1,
        }
    }
}

/// Failures while bringing up or supervising the full stack.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("{tool} not found. Please install it and make sure it is on PATH.")]
    ToolNotFound { tool: String },
    #[error("Failed to install dependencies with `{command}` (exit={exit_code:?})")]
    InstallFailed {
        command: String,
        exit_code: Option<i32>,
    },
    #[error("Failed to spawn {label} process `{command}`: {source}")]
    Spawn {
        label: String,
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to start {label} process: exited during warm-up (exit={exit_code:?})")]
    ServerStartFailed {
        label: String,
        exit_code: Option<i32>,
    },
    #[error("Failed to start {label} process: {source}")]
    ClientStartFailed {
        label: String,
        #[source]
        source: Box<SupervisorError>,
    },
    #[error("Supervisor cannot move from {from} to {to}; create a new supervisor for another run")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
    #[error("Failed to query {label} process state: {source}")]
    Wait {
        label: String,
        #[source]
        source: io::Error,
    },
}

/// Failures of the configuration initializer.
#[derive(Debug, Error)]
pub enum InitializerError {
    #[error("Error: {path} not found! Please ensure the template exists in the project root.")]
    TemplateMissing { path: PathBuf },
    #[error("Error creating {to} from {from}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read confirmation: {source}")]
    Prompt {
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    EnvFile(#[from] EnvFileError),
}
