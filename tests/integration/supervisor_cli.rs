#![cfg(unix)]

use anyhow::Result;
use tempfile::tempdir;

use crate::common::{
    run_binary, stderr_of, stdout_of, toml_path, write_config, write_script, RUN_FULL_STACK,
};

#[tokio::test]
async fn server_failure_during_warmup_never_starts_client() -> Result<()> {
    let temp = tempdir()?;
    let marker = temp.path().join("client-started");
    let config = write_config(
        temp.path(),
        &format!(
            r#"[supervisor]
install_command = []
server_command = ["sh", "-c", "echo boom; exit 3"]
client_command = ["sh", "-c", "touch {}"]
warmup_secs = 1
grace_secs = 1
poll_interval_ms = 50
"#,
            marker.display()
        ),
    );

    let output = run_binary(RUN_FULL_STACK, temp.path(), &config, &[], "").await?;

    assert_eq!(output.status.code(), Some(1), "stdout: {}", stdout_of(&output));
    assert!(!marker.exists(), "client must not start");
    assert!(
        stderr_of(&output).contains("Failed to start SERVER process"),
        "stderr: {}",
        stderr_of(&output)
    );
    Ok(())
}

#[tokio::test]
async fn install_failure_aborts_before_server() -> Result<()> {
    let temp = tempdir()?;
    let marker = temp.path().join("server-started");
    let config = write_config(
        temp.path(),
        &format!(
            r#"[supervisor]
install_command = ["sh", "-c", "exit 5"]
server_command = ["sh", "-c", "touch {}"]
warmup_secs = 0
grace_secs = 1
"#,
            marker.display()
        ),
    );

    let output = run_binary(RUN_FULL_STACK, temp.path(), &config, &[], "").await?;

    assert_eq!(output.status.code(), Some(1));
    assert!(!marker.exists(), "server must not start");
    assert!(stderr_of(&output).contains("Failed to install dependencies"));
    Ok(())
}

#[tokio::test]
async fn default_client_runs_translator_and_stops_server() -> Result<()> {
    let temp = tempdir()?;
    let tool = write_script(temp.path(), "fake-flutter", "echo \"built $*\"");
    let config = write_config(
        temp.path(),
        &format!(
            r#"[translator]
build_tool = {}

[supervisor]
install_command = []
server_command = ["sh", "-c", "exec sleep 30"]
warmup_secs = 0
grace_secs = 1
poll_interval_ms = 50
"#,
            toml_path(&tool)
        ),
    );
    std::fs::write(temp.path().join(".env"), "API_URL=http://localhost:3000\n")?;

    let output = run_binary(RUN_FULL_STACK, temp.path(), &config, &[], "").await?;

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(
        stdout.contains("[CLIENT] built run --define=API_URL=http://localhost:3000"),
        "{stdout}"
    );
    Ok(())
}

#[tokio::test]
async fn failing_client_exits_with_one() -> Result<()> {
    let temp = tempdir()?;
    let config = write_config(
        temp.path(),
        r#"[supervisor]
install_command = []
server_command = ["sh", "-c", "exec sleep 30"]
client_command = ["sh", "-c", "echo client-failed; exit 9"]
warmup_secs = 0
grace_secs = 1
poll_interval_ms = 50
"#,
    );

    let output = run_binary(RUN_FULL_STACK, temp.path(), &config, &["--skip-install"], "").await?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).contains("[CLIENT] client-failed"));
    Ok(())
}
