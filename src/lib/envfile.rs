//! Parsing of `KEY=VALUE` env files.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::lib::{errors::EnvFileError, mask};

/// A single `KEY=VALUE` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub key: String,
    pub value: String,
}

impl EnvEntry {
    /// `KEY=VALUE` with sensitive values masked.
    pub fn masked(&self) -> String {
        format!("{}={}", self.key, mask::display_value(&self.key, &self.value))
    }
}

/// Entries loaded from an env file, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    path: PathBuf,
    entries: Vec<EnvEntry>,
    present: bool,
}

impl EnvFile {
    /// Load `path`; a missing file yields an empty entry list.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, EnvFileError> {
        let path = path.into();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    target: "eventura_devkit::envfile",
                    path = %path.display(),
                    "Env file not found; continuing without entries"
                );
                return Ok(Self {
                    path,
                    entries: Vec::new(),
                    present: false,
                });
            }
            Err(source) => return Err(EnvFileError::Read { path, source }),
        };

        let entries = parse_entries(&contents);
        debug!(
            target: "eventura_devkit::envfile",
            path = %path.display(),
            entries = entries.len(),
            "Loaded env file"
        );
        Ok(Self {
            path,
            entries,
            present: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file existed when loaded.
    pub fn is_present(&self) -> bool {
        self.present
    }

    pub fn entries(&self) -> &[EnvEntry] {
        &self.entries
    }

    /// Build flags of the form `<flag>=<key>=<value>`, one per entry.
    pub fn define_flags(&self, flag: &str) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| format!("{flag}={}={}", entry.key, entry.value))
            .collect()
    }

    /// Keys whose values are masked on display.
    pub fn sensitive_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(|entry| entry.key.as_str())
            .filter(|key| mask::is_sensitive_key(key))
    }
}

/// Parse env file contents. A repeated key keeps its first position and takes the last value.
pub fn parse_entries(contents: &str) -> Vec<EnvEntry> {
    let mut entries: Vec<EnvEntry> = Vec::new();
    for raw_line in contents.lines() {
        let Some((key, value)) = parse_line(raw_line) else {
            continue;
        };

        match entries.iter_mut().find(|entry| entry.key == key) {
            Some(existing) => existing.value = value.to_string(),
            None => entries.push(EnvEntry {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }
    entries
}

/// Split one line into a trimmed key and an unquoted value.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), strip_quotes(value.trim())))
}

/// Remove one pair of matching quotes wrapping the entire value.
pub fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
