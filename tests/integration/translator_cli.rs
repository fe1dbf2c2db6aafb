#![cfg(unix)]

use std::fs;

use anyhow::Result;
use tempfile::tempdir;

use crate::common::{
    run_binary, stderr_of, stdout_of, toml_path, write_config, write_script, LOAD_ENV,
};

#[tokio::test]
async fn injects_env_entries_after_command_words() -> Result<()> {
    let temp = tempdir()?;
    let recorded = temp.path().join("args.txt");
    let tool = write_script(
        temp.path(),
        "fake-flutter",
        &format!("printf '%s\\n' \"$@\" > {}", toml_path(&recorded)),
    );
    let config = write_config(
        temp.path(),
        &format!("[translator]\nbuild_tool = {}\n", toml_path(&tool)),
    );
    fs::write(
        temp.path().join(".env"),
        "# comment\nAPI_URL=\"https://api.example.com\"\n\nSMTP_PASSWORD=supersecret123\nAPI_URL=https://override.example.com\n",
    )?;

    let output = run_binary(
        LOAD_ENV,
        temp.path(),
        &config,
        &["--show-env", "build", "apk", "--release"],
        "",
    )
    .await?;

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(
        fs::read_to_string(&recorded)?,
        "build\napk\n--release\n--define=API_URL=https://override.example.com\n--define=SMTP_PASSWORD=supersecret123\n"
    );

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Loaded environment variables:"), "{stdout}");
    assert!(stdout.contains("  SMTP_PASSWORD=supe******t123"), "{stdout}");
    assert!(!stdout.contains("  SMTP_PASSWORD=supersecret123"), "{stdout}");
    assert!(stdout.contains("Running: "), "{stdout}");
    Ok(())
}

#[tokio::test]
async fn missing_env_file_warns_and_still_runs() -> Result<()> {
    let temp = tempdir()?;
    let recorded = temp.path().join("args.txt");
    let tool = write_script(
        temp.path(),
        "fake-flutter",
        &format!("printf '%s\\n' \"$@\" > {}", toml_path(&recorded)),
    );
    let config = write_config(
        temp.path(),
        &format!("[translator]\nbuild_tool = {}\n", toml_path(&tool)),
    );

    let output = run_binary(LOAD_ENV, temp.path(), &config, &["run"], "").await?;

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let expected = format!(
        "Warning: {} not found. Using default values.",
        temp.path().join(".env").display()
    );
    assert!(stdout_of(&output).contains(&expected), "{}", stdout_of(&output));
    assert!(
        !stderr_of(&output).contains("Env file not found"),
        "missing env file should be reported once: {}",
        stderr_of(&output)
    );
    assert_eq!(fs::read_to_string(&recorded)?, "run\n");
    Ok(())
}

#[tokio::test]
async fn uses_configured_define_flag_and_env_file() -> Result<()> {
    let temp = tempdir()?;
    let recorded = temp.path().join("args.txt");
    let tool = write_script(
        temp.path(),
        "fake-flutter",
        &format!("printf '%s\\n' \"$@\" > {}", toml_path(&recorded)),
    );
    let config = write_config(
        temp.path(),
        &format!(
            "[translator]\nbuild_tool = {}\ndefine_flag = \"--dart-define\"\nenv_file = \"config/app.env\"\n",
            toml_path(&tool)
        ),
    );
    fs::create_dir(temp.path().join("config"))?;
    fs::write(temp.path().join("config/app.env"), "GA_TRACKING_ID='UA-1'\n")?;

    let output = run_binary(LOAD_ENV, temp.path(), &config, &["run"], "").await?;

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(
        fs::read_to_string(&recorded)?,
        "run\n--dart-define=GA_TRACKING_ID=UA-1\n"
    );
    Ok(())
}

#[tokio::test]
async fn tool_exit_code_is_passed_through() -> Result<()> {
    let temp = tempdir()?;
    let tool = write_script(temp.path(), "fake-flutter", "exit 7");
    let config = write_config(
        temp.path(),
        &format!("[translator]\nbuild_tool = {}\n", toml_path(&tool)),
    );

    let output = run_binary(LOAD_ENV, temp.path(), &config, &["run"], "").await?;

    assert_eq!(output.status.code(), Some(7));
    Ok(())
}

#[tokio::test]
async fn missing_tool_exits_with_one() -> Result<()> {
    let temp = tempdir()?;
    let config = write_config(
        temp.path(),
        "[translator]\nbuild_tool = \"definitely-not-a-build-tool-xyz\"\n",
    );

    let output = run_binary(LOAD_ENV, temp.path(), &config, &["run"], "").await?;

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr_of(&output).contains(
            "definitely-not-a-build-tool-xyz not found. Make sure definitely-not-a-build-tool-xyz is installed"
        ),
        "stderr: {}",
        stderr_of(&output)
    );
    Ok(())
}

#[tokio::test]
async fn missing_command_is_a_usage_error() -> Result<()> {
    let temp = tempdir()?;
    let config = write_config(temp.path(), "");

    let output = run_binary(LOAD_ENV, temp.path(), &config, &[], "").await?;

    assert_eq!(output.status.code(), Some(2));
    Ok(())
}
