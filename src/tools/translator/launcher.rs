use std::{
    io,
    path::{Path, PathBuf},
    process::Command,
};

use tracing::{debug, info};

use crate::lib::errors::TranslatorError;

use super::Invocation;

/// How the build tool takes over from the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Replace the current process image (Unix `exec`); falls back to `Spawn` elsewhere.
    Replace,
    /// Run the tool as a child and wait for it.
    Spawn,
}

impl Default for LaunchMode {
    fn default() -> Self {
        if cfg!(unix) {
            LaunchMode::Replace
        } else {
            LaunchMode::Spawn
        }
    }
}

/// Locate the build tool on `PATH` (or check an explicit path).
pub fn resolve_tool(tool: &str) -> Result<PathBuf, TranslatorError> {
    which::which(tool).map_err(|err| {
        debug!(
            target: "eventura_devkit::translator",
            tool,
            error = %err,
            "Build tool lookup failed"
        );
        TranslatorError::ToolNotFound {
            tool: tool.to_string(),
        }
    })
}

/// Run the invocation. With `Replace` on Unix this only returns on failure.
pub fn launch(invocation: &Invocation, mode: LaunchMode) -> Result<(), TranslatorError> {
    let program = resolve_tool(&invocation.tool)?;
    info!(
        target: "eventura_devkit::translator",
        tool = %invocation.tool,
        program = %program.display(),
        args = invocation.args.len(),
        mode = ?mode,
        "Launching build tool"
    );

    match mode {
        LaunchMode::Replace => replace_process(&program, invocation),
        LaunchMode::Spawn => spawn_and_wait(&program, invocation),
    }
}

#[cfg(unix)]
fn replace_process(program: &Path, invocation: &Invocation) -> Result<(), TranslatorError> {
    use std::os::unix::process::CommandExt;

    let err = Command::new(program).args(&invocation.args).exec();
    Err(launch_error(&invocation.tool, err))
}

#[cfg(not(unix))]
fn replace_process(program: &Path, invocation: &Invocation) -> Result<(), TranslatorError> {
    spawn_and_wait(program, invocation)
}

fn spawn_and_wait(program: &Path, invocation: &Invocation) -> Result<(), TranslatorError> {
    let status = Command::new(program)
        .args(&invocation.args)
        .status()
        .map_err(|err| launch_error(&invocation.tool, err))?;

    if status.success() {
        return Ok(());
    }
    Err(TranslatorError::ToolFailed {
        tool: invocation.tool.clone(),
        exit_code: status.code(),
    })
}

fn launch_error(tool: &str, source: io::Error) -> TranslatorError {
    if source.kind() == io::ErrorKind::NotFound {
        TranslatorError::ToolNotFound {
            tool: tool.to_string(),
        }
    } else {
        TranslatorError::Launch {
            tool: tool.to_string(),
            source,
        }
    }
}
