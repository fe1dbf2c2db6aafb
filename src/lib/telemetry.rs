//! Telemetry initialization and supervisor run span helpers.

use std::time::Instant;

use anyhow::Result;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Initialize `tracing` and format developer logs on stderr.
///
/// Defaults to `warn` so that user-facing output on stdout is not drowned out;
/// set `RUST_LOG` for more detail.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper to record start and finish of a supervisor run.
pub struct RunSpan {
    span: Span,
    started_at: Instant,
    run_id: Uuid,
}

impl RunSpan {
    /// Start a run span.
    pub fn start(run_id: Uuid) -> Self {
        let span = info_span!(
            target: "eventura_devkit::supervisor",
            "stack_run",
            %run_id
        );
        Self {
            span,
            started_at: Instant::now(),
            run_id,
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Close the span while recording status and completion info.
    pub fn finish(self, status: &'static str, exit_code: u8) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        info!(
            target: "eventura_devkit::supervisor",
            run_id = %self.run_id,
            status = status,
            exit_code = exit_code,
            elapsed_ms = elapsed_ms,
            "Completed stack run"
        );
    }
}

/// Payload for logging the resolved stack plan as structured telemetry.
#[derive(Debug)]
pub struct StackPlanTelemetry<'a> {
    pub project_root: &'a str,
    pub config_path: Option<&'a str>,
    pub install: Option<String>,
    pub server: String,
    pub client: String,
    pub warmup_ms: u128,
    pub grace_ms: u128,
}

/// Emit the stack plan to `tracing`.
pub fn emit_stack_plan(telemetry: &StackPlanTelemetry<'_>) {
    info!(
        target: "eventura_devkit::supervisor",
        project_root = telemetry.project_root,
        config_path = telemetry.config_path.unwrap_or(""),
        install = telemetry.install.as_deref().unwrap_or(""),
        server = %telemetry.server,
        client = %telemetry.client,
        warmup_ms = telemetry.warmup_ms,
        grace_ms = telemetry.grace_ms,
        "Resolved stack plan"
    );
}
