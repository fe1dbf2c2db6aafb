use std::{path::Path, time::Duration};

use serde::Deserialize;

use crate::lib::{errors::ConfigError, process::CommandSpec};

pub const DEFAULT_INSTALL_COMMAND: &[&str] = &["npm", "install"];
pub const DEFAULT_SERVER_COMMAND: &[&str] = &["npm", "start"];
pub const DEFAULT_CLIENT_ARGS: &[&str] = &["run"];
pub const DEFAULT_SERVER_LABEL: &str = "SERVER";
pub const DEFAULT_CLIENT_LABEL: &str = "CLIENT";
pub const DEFAULT_WARMUP_SECS: u64 = 3;
pub const DEFAULT_GRACE_SECS: u64 = 5;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
const MIN_POLL_INTERVAL_MS: u64 = 10;

/// Settings for the full-stack supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorSection {
    /// `None` disables the install step.
    pub install_command: Option<CommandSpec>,
    pub server_command: CommandSpec,
    /// `None` runs the bundled translator binary with `client_args`.
    pub client_command: Option<CommandSpec>,
    pub client_args: Vec<String>,
    pub server_label: String,
    pub client_label: String,
    pub warmup: Duration,
    pub grace: Duration,
    pub poll_interval: Duration,
}

impl Default for SupervisorSection {
    fn default() -> Self {
        Self {
            install_command: Some(default_spec(DEFAULT_INSTALL_COMMAND)),
            server_command: default_spec(DEFAULT_SERVER_COMMAND),
            client_command: None,
            client_args: DEFAULT_CLIENT_ARGS.iter().map(|arg| arg.to_string()).collect(),
            server_label: DEFAULT_SERVER_LABEL.to_string(),
            client_label: DEFAULT_CLIENT_LABEL.to_string(),
            warmup: Duration::from_secs(DEFAULT_WARMUP_SECS),
            grace: Duration::from_secs(DEFAULT_GRACE_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawSupervisorSection {
    pub install_command: Option<Vec<String>>,
    pub server_command: Option<Vec<String>>,
    pub client_command: Option<Vec<String>>,
    pub client_args: Option<Vec<String>>,
    pub server_label: Option<String>,
    pub client_label: Option<String>,
    pub warmup_secs: Option<u64>,
    pub grace_secs: Option<u64>,
    pub poll_interval_ms: Option<u64>,
}

pub fn parse_supervisor_section(
    raw: Option<RawSupervisorSection>,
    path: &Path,
) -> Result<SupervisorSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let defaults = SupervisorSection::default();

    let install_command = match raw.install_command {
        Some(words) => CommandSpec::from_words(&words),
        None => defaults.install_command,
    };

    let server_command = match raw.server_command {
        Some(words) => CommandSpec::from_words(&words).ok_or_else(|| {
            invalid(
                path,
                "supervisor.server_command",
                "Use a non-empty command such as [\"npm\", \"start\"]",
            )
        })?,
        None => defaults.server_command,
    };

    let client_command = raw
        .client_command
        .and_then(|words| CommandSpec::from_words(&words));
    let client_args = raw.client_args.unwrap_or(defaults.client_args);

    let server_label = raw.server_label.unwrap_or(defaults.server_label);
    validate_label(path, "supervisor.server_label", &server_label)?;
    let client_label = raw.client_label.unwrap_or(defaults.client_label);
    validate_label(path, "supervisor.client_label", &client_label)?;

    let warmup = raw
        .warmup_secs
        .map(Duration::from_secs)
        .unwrap_or(defaults.warmup);

    let grace_secs = raw.grace_secs.unwrap_or(DEFAULT_GRACE_SECS);
    if grace_secs == 0 {
        return Err(invalid(
            path,
            "supervisor.grace_secs",
            "Use a grace period of at least 1 second",
        ));
    }

    let poll_interval_ms = raw.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS);
    if poll_interval_ms < MIN_POLL_INTERVAL_MS {
        return Err(invalid(
            path,
            "supervisor.poll_interval_ms",
            "Use a poll interval of at least 10 milliseconds",
        ));
    }

    Ok(SupervisorSection {
        install_command,
        server_command,
        client_command,
        client_args,
        server_label,
        client_label,
        warmup,
        grace: Duration::from_secs(grace_secs),
        poll_interval: Duration::from_millis(poll_interval_ms),
    })
}

fn default_spec(words: &[&str]) -> CommandSpec {
    CommandSpec::new(words[0], words[1..].iter().copied())
}

fn validate_label(path: &Path, field: &'static str, label: &str) -> Result<(), ConfigError> {
    if label.trim().is_empty() {
        return Err(invalid(path, field, "Use a non-empty output label"));
    }
    Ok(())
}

fn invalid(path: &Path, field: &'static str, message: &str) -> ConfigError {
    ConfigError::InvalidField {
        path: path.to_path_buf(),
        field,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: RawSupervisorSection) -> Result<SupervisorSection, ConfigError> {
        parse_supervisor_section(Some(raw), Path::new("devkit.toml"))
    }

    fn field_of(err: ConfigError) -> &'static str {
        match err {
            ConfigError::InvalidField { field, .. } => field,
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn defaults_match_reference_behaviour() {
        let section = parse_supervisor_section(None, Path::new("devkit.toml")).expect("defaults");
        assert_eq!(
            section.install_command.map(|spec| spec.to_string()).as_deref(),
            Some("npm install")
        );
        assert_eq!(section.server_command.to_string(), "npm start");
        assert!(section.client_command.is_none());
        assert_eq!(section.client_args, vec!["run"]);
        assert_eq!(section.warmup, Duration::from_secs(3));
        assert_eq!(section.grace, Duration::from_secs(5));
    }

    #[test]
    fn empty_install_command_disables_install() {
        let section = parse(RawSupervisorSection {
            install_command: Some(Vec::new()),
            ..Default::default()
        })
        .expect("valid section");
        assert!(section.install_command.is_none());
    }

    #[test]
    fn empty_server_command_is_rejected() {
        let err = parse(RawSupervisorSection {
            server_command: Some(Vec::new()),
            ..Default::default()
        })
        .expect_err("server command is required");
        assert_eq!(field_of(err), "supervisor.server_command");
    }

    #[test]
    fn zero_grace_is_rejected() {
        let err = parse(RawSupervisorSection {
            grace_secs: Some(0),
            ..Default::default()
        })
        .expect_err("grace must be positive");
        assert_eq!(field_of(err), "supervisor.grace_secs");
    }

    #[test]
    fn tiny_poll_interval_is_rejected() {
        let err = parse(RawSupervisorSection {
            poll_interval_ms: Some(1),
            ..Default::default()
        })
        .expect_err("poll interval too small");
        assert_eq!(field_of(err), "supervisor.poll_interval_ms");
    }
}
