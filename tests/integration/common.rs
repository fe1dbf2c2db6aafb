use std::{
    fs,
    path::{Path, PathBuf},
    process::{Output, Stdio},
    time::Duration,
};

use anyhow::{Context, Result};
use tokio::{io::AsyncWriteExt, process::Command, time::timeout};

pub const LOAD_ENV: &str = env!("CARGO_BIN_EXE_load-env");
pub const RUN_FULL_STACK: &str = env!("CARGO_BIN_EXE_run-full-stack");
pub const SETUP_ENV: &str = env!("CARGO_BIN_EXE_setup-env");

const RUN_TIMEOUT: Duration = Duration::from_secs(30);

/// Run a binary inside `cwd` with `--config <config>` prepended, feeding `stdin`.
pub async fn run_binary(
    binary: &str,
    cwd: &Path,
    config: &Path,
    args: &[&str],
    stdin: &str,
) -> Result<Output> {
    let mut child = Command::new(binary)
        .arg("--config")
        .arg(config)
        .args(args)
        .current_dir(cwd)
        .env_remove("DEVKIT_CONFIG_PATH")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to spawn {binary}"))?;

    if let Some(mut input) = child.stdin.take() {
        input.write_all(stdin.as_bytes()).await?;
    }

    let output = timeout(RUN_TIMEOUT, child.wait_with_output())
        .await
        .context("binary did not finish in time")??;
    Ok(output)
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Write `devkit.toml` into `dir` and return its path.
pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("devkit.toml");
    fs::write(&path, contents).expect("can write devkit.toml");
    path
}

/// Write an executable shell script.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("can write script");
    let mut permissions = fs::metadata(&path).expect("metadata").permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).expect("can chmod script");
    path
}

/// TOML string literal for a path.
pub fn toml_path(path: &Path) -> String {
    format!("{:?}", path.display().to_string())
}
