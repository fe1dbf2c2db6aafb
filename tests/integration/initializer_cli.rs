use std::fs;

use anyhow::Result;
use tempfile::tempdir;

use crate::common::{run_binary, stderr_of, stdout_of, write_config, SETUP_ENV};

const TEMPLATE: &str = "API_URL=https://api.example.com\nSMTP_PASSWORD=changeme-password\nJWT_SECRET=short\n";

#[tokio::test]
async fn setup_creates_env_and_lists_sensitive_keys() -> Result<()> {
    let temp = tempdir()?;
    let config = write_config(temp.path(), "");
    fs::write(temp.path().join("env_actual_values.txt"), TEMPLATE)?;

    let output = run_binary(SETUP_ENV, temp.path(), &config, &[], "").await?;

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(fs::read_to_string(temp.path().join(".env"))?, TEMPLATE);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Successfully created"), "{stdout}");
    assert!(stdout.contains("   - SMTP_PASSWORD"), "{stdout}");
    assert!(stdout.contains("   - JWT_SECRET"), "{stdout}");
    assert!(!stdout.contains("   - API_URL"), "{stdout}");
    Ok(())
}

#[tokio::test]
async fn declined_overwrite_leaves_existing_file() -> Result<()> {
    let temp = tempdir()?;
    let config = write_config(temp.path(), "");
    fs::write(temp.path().join("env_actual_values.txt"), TEMPLATE)?;
    fs::write(temp.path().join(".env"), "API_URL=http://localhost:3000\n")?;

    let output = run_binary(SETUP_ENV, temp.path(), &config, &["setup"], "n\n").await?;

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("Setup cancelled."));
    assert_eq!(
        fs::read_to_string(temp.path().join(".env"))?,
        "API_URL=http://localhost:3000\n"
    );
    Ok(())
}

#[tokio::test]
async fn accepted_overwrite_replaces_existing_file() -> Result<()> {
    let temp = tempdir()?;
    let config = write_config(temp.path(), "");
    fs::write(temp.path().join("env_actual_values.txt"), TEMPLATE)?;
    fs::write(temp.path().join(".env"), "API_URL=http://localhost:3000\n")?;

    let output = run_binary(SETUP_ENV, temp.path(), &config, &["setup"], "Y\n").await?;

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(fs::read_to_string(temp.path().join(".env"))?, TEMPLATE);
    Ok(())
}

#[tokio::test]
async fn missing_template_fails() -> Result<()> {
    let temp = tempdir()?;
    let config = write_config(temp.path(), "");

    let output = run_binary(SETUP_ENV, temp.path(), &config, &["setup"], "").await?;

    assert_eq!(output.status.code(), Some(1));
    assert!(!temp.path().join(".env").exists());
    Ok(())
}

#[tokio::test]
async fn show_masks_sensitive_values() -> Result<()> {
    let temp = tempdir()?;
    let config = write_config(temp.path(), "");
    fs::write(temp.path().join(".env"), TEMPLATE)?;

    let output = run_binary(SETUP_ENV, temp.path(), &config, &["show"], "").await?;

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Current Environment Configuration:"), "{stdout}");
    assert!(stdout.contains("  API_URL=https://api.example.com"), "{stdout}");
    assert!(stdout.contains("  SMTP_PASSWORD=chan*********word"), "{stdout}");
    assert!(stdout.contains("  JWT_SECRET=****"), "{stdout}");
    Ok(())
}

#[tokio::test]
async fn show_without_env_file_points_to_setup() -> Result<()> {
    let temp = tempdir()?;
    let config = write_config(temp.path(), "");

    let output = run_binary(SETUP_ENV, temp.path(), &config, &["show"], "").await?;

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("Run setup first."));
    Ok(())
}

#[tokio::test]
async fn help_prints_usage() -> Result<()> {
    let temp = tempdir()?;
    let config = write_config(temp.path(), "");

    let output = run_binary(SETUP_ENV, temp.path(), &config, &["help"], "").await?;

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("setup"), "{stdout}");
    assert!(stdout.contains("show"), "{stdout}");
    Ok(())
}
