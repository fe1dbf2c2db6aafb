use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

/// Destination for relayed child output.
///
/// Implementations only need to keep a single line intact; lines from
/// different children may interleave.
pub trait OutputSink: Send + Sync + 'static {
    /// Forward one line of child output.
    fn emit(&self, label: &str, line: &str);
    /// Report a supervisor status message.
    fn status(&self, message: &str);
}

/// Format a relayed line.
pub fn format_line(label: &str, line: &str) -> String {
    format!("[{label}] {line}")
}

/// Writes relayed lines to the process's stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&self, label: &str, line: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", format_line(label, line));
        let _ = stdout.flush();
    }

    fn status(&self, message: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{message}");
        let _ = stdout.flush();
    }
}

/// Keeps relayed lines in memory.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    lines: Arc<Mutex<Vec<String>>>,
    statuses: Arc<Mutex<Vec<String>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.statuses
            .lock()
            .map(|statuses| statuses.clone())
            .unwrap_or_default()
    }
}

impl OutputSink for CollectingSink {
    fn emit(&self, label: &str, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(format_line(label, line));
        }
    }

    fn status(&self, message: &str) {
        if let Ok(mut statuses) = self.statuses.lock() {
            statuses.push(message.to_string());
        }
    }
}
