use std::process::ExitCode;

use anyhow::Error;

/// Bundles a user-facing error message with the process exit code.
#[derive(Debug)]
pub struct RuntimeExit {
    message: String,
    exit_code: u8,
}

impl RuntimeExit {
    pub fn new(message: impl Into<String>, exit_code: u8) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Generic failure (exit 1) carrying the full error chain.
    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: format!("{err:#}"),
            exit_code: 1,
        }
    }

    pub fn report(self) -> ExitCode {
        if !self.message.is_empty() {
            eprintln!("{}", self.message);
        }
        ExitCode::from(self.exit_code)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}
