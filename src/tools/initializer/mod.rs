//! Bootstrap the working `.env` from its checked-in template and display it safely.
use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    config::InitializerSection,
    lib::{envfile::EnvFile, errors::InitializerError, paths::resolve_in_root},
};

/// Source of yes/no answers for overwrite confirmation.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Prompts on stdout and reads the answer from stdin; only `y` confirms.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;
        drop(stdout);

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_affirmative(&answer))
    }
}

/// A fixed answer, for non-interactive use.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
        Ok(self.0)
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Template and working file, resolved against the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializerPaths {
    pub template: PathBuf,
    pub target: PathBuf,
}

impl InitializerPaths {
    pub fn resolve(section: &InitializerSection, project_root: &Path) -> Self {
        Self {
            template: resolve_in_root(project_root, &section.template_file),
            target: resolve_in_root(project_root, &section.target_file),
        }
    }
}

/// What `setup` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    Created { sensitive_keys: Vec<String> },
    Overwritten { sensitive_keys: Vec<String> },
    Cancelled,
}

/// Copy the template over the working file, asking before replacing an existing one.
pub fn setup(
    paths: &InitializerPaths,
    force: bool,
    confirm: &mut dyn Confirm,
) -> Result<SetupOutcome, InitializerError> {
    if !paths.template.is_file() {
        return Err(InitializerError::TemplateMissing {
            path: paths.template.clone(),
        });
    }

    let existed = paths.target.exists();
    if existed && !force {
        let prompt = format!(
            "Warning: {} already exists!\nDo you want to overwrite it? (y/N): ",
            paths.target.display()
        );
        let accepted = confirm
            .confirm(&prompt)
            .map_err(|source| InitializerError::Prompt { source })?;
        if !accepted {
            info!(
                target: "eventura_devkit::initializer",
                target_file = %paths.target.display(),
                "Overwrite declined"
            );
            return Ok(SetupOutcome::Cancelled);
        }
    }

    let bytes = fs::copy(&paths.template, &paths.target).map_err(|source| {
        InitializerError::Copy {
            from: paths.template.clone(),
            to: paths.target.clone(),
            source,
        }
    })?;
    info!(
        target: "eventura_devkit::initializer",
        template = %paths.template.display(),
        target_file = %paths.target.display(),
        bytes,
        overwritten = existed,
        "Created working configuration"
    );

    let sensitive_keys = EnvFile::load(&paths.target)?
        .sensitive_keys()
        .map(str::to_string)
        .collect();
    Ok(if existed {
        SetupOutcome::Overwritten { sensitive_keys }
    } else {
        SetupOutcome::Created { sensitive_keys }
    })
}

/// What `show` found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowOutcome {
    Missing,
    /// `KEY=VALUE` lines with sensitive values masked.
    Entries(Vec<String>),
}

/// Read the working file and render its entries with sensitive values masked.
pub fn show(paths: &InitializerPaths) -> Result<ShowOutcome, InitializerError> {
    let env = EnvFile::load(&paths.target)?;
    if !env.is_present() {
        return Ok(ShowOutcome::Missing);
    }
    Ok(ShowOutcome::Entries(
        env.entries().iter().map(|entry| entry.masked()).collect(),
    ))
}

/// Follow-up instructions printed after a successful setup.
pub fn next_steps(target: &Path, sensitive_keys: &[String]) -> Vec<String> {
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| target.display().to_string());

    let mut lines = vec![String::new(), "Next Steps:".to_string()];
    if sensitive_keys.is_empty() {
        lines.push(format!("1. Review {name} and fill in real values."));
    } else {
        lines.push(format!(
            "1. Edit {name} and update the following values:"
        ));
        lines.extend(sensitive_keys.iter().map(|key| format!("   - {key}")));
    }
    lines.push(String::new());
    lines.push("2. Check the configuration:".to_string());
    lines.push("   setup-env show".to_string());
    lines.push("   load-env --show-env run".to_string());
    lines.push(String::new());
    lines.push("3. Run the app:".to_string());
    lines.push("   load-env run".to_string());
    lines.push("   run-full-stack".to_string());
    lines.push(String::new());
    lines.push("Security Note:".to_string());
    lines.push(format!("- Never commit {name} to version control"));
    lines.push("- Use different credentials for development and production".to_string());
    lines
}
